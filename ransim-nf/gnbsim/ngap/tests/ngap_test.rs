use gnbsim_ngap::pdu::PROC_NG_SETUP;
use gnbsim_ngap::transfer::*;
use gnbsim_ngap::*;

fn test_plmn() -> PlmnIdentity {
	PlmnIdentity([0x02, 0xF8, 0x39])
}

fn test_global_ran_node_id() -> GlobalRanNodeId {
	GlobalRanNodeId::GlobalGnbId(GlobalGnbId {
		plmn_identity: test_plmn(),
		gnb_id: GnbId::new_22_bit(1),
	})
}

fn test_user_location() -> UserLocationInformation {
	UserLocationInformation::Nr(UserLocationInformationNr {
		nr_cgi: NrCgi {
			plmn_identity: test_plmn(),
			nr_cell_identity: NrCellIdentity(0x10),
		},
		tai: TaiIe { plmn_identity: test_plmn(), tac: Tac::from_u32(1) },
	})
}

fn round_trip(pdu: NgapPdu) -> NgapPdu {
	let bytes = codec_to_bytes(&pdu).unwrap();
	let decoded = decode_ngap_pdu(&bytes).unwrap();
	assert_eq!(decoded, pdu);
	decoded
}

#[test]
fn ng_setup_request_round_trips_and_frames_correctly() {
	let request = NgSetupRequest {
		global_ran_node_id: test_global_ran_node_id(),
		ran_node_name: None,
		supported_ta_list: vec![SupportedTaItem {
			tac: Tac::from_u32(1),
			broadcast_plmn_list: vec![BroadcastPlmnItem {
				plmn_identity: test_plmn(),
				tai_slice_support_list: vec![SliceSupportItem {
					snssai: SnssaiIe { sst: 1, sd: None },
				}],
			}],
		}],
		default_paging_drx: PagingDrx::V128,
	};
	let bytes = codec_to_bytes(&request.clone().to_pdu()).unwrap();

	// initiatingMessage, procedureCode 21, criticality reject, then the
	// open-type length and the container with three IEs.
	assert_eq!(bytes[0], 0x00);
	assert_eq!(bytes[1], PROC_NG_SETUP);
	assert_eq!(bytes[2], 0x00);
	assert_eq!(bytes[3] as usize, bytes.len() - 4);
	assert_eq!(&bytes[4..7], &[0x00, 0x00, 0x03]);
	// First IE: GlobalRANNodeID (27, reject, 8 octets) for a 22-bit gNB-ID
	// of value 1.
	assert_eq!(
		&bytes[7..19],
		&[0x00, 0x1B, 0x00, 0x08, 0x00, 0x02, 0xF8, 0x39, 0x00, 0x00, 0x00, 0x04]
	);

	round_trip(request.to_pdu());
}

#[test]
fn initial_ue_message_round_trips() {
	let message = InitialUeMessage {
		ran_ue_ngap_id: RanUeNgapId(1),
		nas_pdu: NasPdu(vec![0x7E, 0x00, 0x41, 0x79]),
		user_location_information: test_user_location(),
		rrc_establishment_cause: RrcEstablishmentCause::MoSignalling,
		ue_context_request: true,
	};
	round_trip(message.to_pdu());
}

#[test]
fn nas_transports_round_trip() {
	let downlink = DownlinkNasTransport {
		amf_ue_ngap_id: AmfUeNgapId(0x0102030405),
		ran_ue_ngap_id: RanUeNgapId(7),
		nas_pdu: NasPdu(vec![0x7E, 0x00, 0x56]),
	};
	round_trip(downlink.to_pdu());

	let uplink = UplinkNasTransport {
		amf_ue_ngap_id: AmfUeNgapId(1),
		ran_ue_ngap_id: RanUeNgapId(1),
		nas_pdu: NasPdu(vec![0x7E, 0x00, 0x57]),
		user_location_information: test_user_location(),
	};
	round_trip(uplink.to_pdu());
}

#[test]
fn initial_context_setup_round_trips() {
	let request = InitialContextSetupRequest {
		amf_ue_ngap_id: AmfUeNgapId(2),
		ran_ue_ngap_id: RanUeNgapId(1),
		nas_pdu: Some(NasPdu(vec![0x7E, 0x02, 0xAA, 0xBB, 0xCC, 0xDD, 0x01, 0x7E, 0x00, 0x42])),
	};
	round_trip(request.to_pdu());

	let response = InitialContextSetupResponse {
		amf_ue_ngap_id: AmfUeNgapId(2),
		ran_ue_ngap_id: RanUeNgapId(1),
		pdu_session_setup_list: None,
	};
	round_trip(response.to_pdu());
}

#[test]
fn unknown_procedures_survive_a_round_trip() {
	// Paging (procedure code 24) is outside the modelled set.
	let pdu = NgapPdu::InitiatingMessage(InitiatingMessage::Unknown(pdu::UnknownMessage {
		procedure_code: 24,
		criticality: Criticality::Ignore,
		value: vec![0x00, 0x00, 0x00],
	}));
	round_trip(pdu);
}

#[test]
fn ng_setup_response_and_failure_round_trip() {
	let response = NgSetupResponse {
		amf_name: Some("open5gs-amf0".into()),
		relative_amf_capacity: Some(255),
	};
	round_trip(response.to_pdu());

	let failure = NgSetupFailure {
		cause: Cause::Misc(CauseMisc::UnknownPlmnOrSnpn),
	};
	round_trip(failure.to_pdu());
}

#[test]
fn error_indication_round_trips() {
	let indication = ErrorIndication {
		amf_ue_ngap_id: None,
		ran_ue_ngap_id: Some(RanUeNgapId(9)),
		cause: Some(Cause::Protocol(CauseProtocol::MessageNotCompatibleWithReceiverState)),
	};
	round_trip(indication.to_pdu());
}

#[test]
fn setup_request_transfer_round_trips() {
	let transfer = PduSessionResourceSetupRequestTransfer {
		ul_ngu_up_tnl_information: UpTransportLayerInformation::GtpTunnel(GtpTunnel {
			transport_layer_address: TransportLayerAddress::from_ip("10.100.200.3".parse().unwrap()),
			gtp_teid: GtpTeid(0x00000001),
		}),
		pdu_session_type: PduSessionType::Ipv4v6,
		qos_flows: vec![QosFlowSetupRequestItem {
			qos_flow_identifier: QosFlowIdentifier(1),
			parameters: QosFlowLevelQosParameters {
				characteristics: QosCharacteristics::NonDynamic(NonDynamic5Qi {
					five_qi: 9,
					priority_level: None,
				}),
				arp: AllocationAndRetentionPriority {
					priority_level: 8,
					may_trigger_preemption: false,
					preemption_vulnerable: false,
				},
				gbr: None,
			},
		}],
	};
	let bytes = transfer.encode_bytes().unwrap();
	assert_eq!(PduSessionResourceSetupRequestTransfer::decode_bytes(&bytes).unwrap(), transfer);
}

#[test]
fn ipv4_transport_layer_address_has_the_classic_prefix() {
	let address = TransportLayerAddress::from_ip("192.168.56.210".parse().unwrap());
	let bytes = asn1_per::to_bytes(&address).unwrap();
	// Extension bit, 8-bit length of 31, alignment: 0x0F 0x80 then the
	// address octets.
	assert_eq!(bytes, vec![0x0F, 0x80, 0xC0, 0xA8, 0x38, 0xD2]);
}

#[test]
fn setup_response_transfer_round_trips() {
	let transfer = PduSessionResourceSetupResponseTransfer {
		dl_qos_flow_per_tnl_information: QosFlowPerTnlInformation {
			up_tnl_information: UpTransportLayerInformation::GtpTunnel(GtpTunnel {
				transport_layer_address: TransportLayerAddress::from_ip(
					"192.168.1.10".parse().unwrap(),
				),
				gtp_teid: GtpTeid(0x00010000),
			}),
			associated_qos_flows: vec![AssociatedQosFlowItem {
				qos_flow_identifier: QosFlowIdentifier(1),
			}],
		},
	};
	let bytes = transfer.encode_bytes().unwrap();
	assert_eq!(
		PduSessionResourceSetupResponseTransfer::decode_bytes(&bytes).unwrap(),
		transfer
	);
}

#[test]
fn pdu_session_resource_setup_round_trips() {
	let request = PduSessionResourceSetupRequest {
		amf_ue_ngap_id: AmfUeNgapId(2),
		ran_ue_ngap_id: RanUeNgapId(1),
		nas_pdu: None,
		setup_list: vec![PduSessionResourceSetupItemReq {
			pdu_session_id: 1,
			nas_pdu: Some(NasPdu(vec![0x7E, 0x00, 0x68])),
			snssai: SnssaiIe { sst: 1, sd: Some([0x01, 0x02, 0x03]) },
			transfer: vec![0x00, 0x00, 0x01],
		}],
	};
	round_trip(request.to_pdu());

	let response = PduSessionResourceSetupResponse {
		amf_ue_ngap_id: AmfUeNgapId(2),
		ran_ue_ngap_id: RanUeNgapId(1),
		setup_list: Some(vec![PduSessionResourceSetupItemRes {
			pdu_session_id: 1,
			transfer: vec![0x04, 0x05],
		}]),
	};
	round_trip(response.to_pdu());
}
