//! Drives one UE through registration and PDU session establishment, with
//! the test playing the core: it decodes the gNB's NGAP, runs the same
//! Milenage and KDF chain, and frames its downlink the way an AMF would.

use std::sync::Arc;

use gnbsim_app::config::{
	BroadcastPlmnConfig,
	GnbConfig,
	PagingDrxConfig,
	SupportedTaConfig,
	UeTemplateConfig,
};
use gnbsim_app::context::{GnbContext, UeContext};
use gnbsim_app::ngap::{NgapEngine, UeSession};
use gnbsim_nas::message::*;
use gnbsim_nas::parser::GmmMessage;
use gnbsim_nas::security::kdf::{
	ALGORITHM_TYPE_NAS_ENC,
	ALGORITHM_TYPE_NAS_INT,
	derive_algorithm_key,
	derive_kamf,
	derive_kausf,
	derive_kseaf,
	derive_res_star,
	serving_network_name,
};
use gnbsim_nas::security::milenage::Milenage;
use gnbsim_nas::security::{
	self,
	NasDirection,
	SecurityHeaderType,
};
use gnbsim_nas::types::{FiveGGuti, GprsTimer3, MobileIdentity, Plmn, Snssai, UeSecurityCapability};
use gnbsim_ngap::transfer::*;
use gnbsim_ngap::*;
use nonempty::NonEmpty;

const K: [u8; 16] = [
	0x46, 0x5B, 0x5C, 0xE8, 0xB1, 0x99, 0xB4, 0x9F, 0xAA, 0x5F, 0x0A, 0x2E, 0xE2, 0x38, 0xA6,
	0xBC,
];
const OPC: [u8; 16] = [
	0xCD, 0x63, 0xCB, 0x71, 0x95, 0x4A, 0x9F, 0x4E, 0x48, 0xA5, 0x99, 0x4E, 0x37, 0xA0, 0x2B,
	0xAF,
];
const RAND: [u8; 16] = [0x23; 16];
const SQN: [u8; 6] = [0x00, 0x00, 0x00, 0x00, 0x00, 0x21];
const AUTN_AMF: [u8; 2] = [0x80, 0x00];
const ABBA: [u8; 2] = [0x00, 0x00];

fn plmn() -> Plmn {
	Plmn { mcc: "208".into(), mnc: "93".into() }
}

fn gnb_config() -> GnbConfig {
	GnbConfig {
		plmn: plmn(),
		gnb_id: 1,
		supported_ta_list: vec![SupportedTaConfig {
			tac: 1,
			broadcast_plmns: vec![BroadcastPlmnConfig {
				plmn: plmn(),
				snssais: NonEmpty::new(Snssai { sst: 1, sd: None }),
			}],
		}],
		paging_drx: PagingDrxConfig::V128,
		gtpu_addr: "192.168.1.2".parse().unwrap(),
		gtpu_interface: "gtp-gnb".into(),
		n2_addrs: vec!["192.168.1.1".parse().unwrap()],
		n2_port: 38412,
		n2_local_port: None,
		cell_local_id: 1,
		teid_seed: 0x100,
	}
}

fn ue_template() -> UeTemplateConfig {
	UeTemplateConfig {
		plmn: plmn(),
		msin: "0000000003".into(),
		imeisv: "4370816125816151".into(),
		k: K,
		opc: OPC,
		amf: [0x80, 0x00],
		routing_indicator: "0".into(),
		protection_scheme: 0,
		count: 1,
		dnn: "internet".into(),
		snssai: Snssai { sst: 1, sd: None },
		pdu_session_id: 1,
		force_initial_nas_replay: true,
	}
}

/// Core-side 5G-AKA: AUTN for the challenge plus the keys the AMF would
/// hold afterwards.
struct CoreSecurity {
	autn: Vec<u8>,
	res_star: [u8; 16],
	kint: [u8; 16],
	_kenc: [u8; 16],
}

fn core_security(supi: &str) -> CoreSecurity {
	let milenage = Milenage::new(&K, &OPC);
	let mac_a = milenage.f1(&RAND, &SQN, &AUTN_AMF);
	let (res, ck, ik, ak) = milenage.f2345(&RAND);
	let mut sqn_xor_ak = SQN;
	for (byte, mask) in sqn_xor_ak.iter_mut().zip(&ak) {
		*byte ^= mask;
	}
	let mut autn = Vec::with_capacity(16);
	autn.extend_from_slice(&sqn_xor_ak);
	autn.extend_from_slice(&AUTN_AMF);
	autn.extend_from_slice(&mac_a);

	let snn = serving_network_name("208", "93");
	let res_star = derive_res_star(&ck, &ik, &snn, &RAND, &res);
	let kausf = derive_kausf(&ck, &ik, &snn, &sqn_xor_ak);
	let kseaf = derive_kseaf(&kausf, &snn);
	let kamf = derive_kamf(&kseaf, supi, &ABBA);
	CoreSecurity {
		autn,
		res_star,
		kint: derive_algorithm_key(&kamf, ALGORITHM_TYPE_NAS_INT, 2),
		_kenc: derive_algorithm_key(&kamf, ALGORITHM_TYPE_NAS_ENC, 0),
	}
}

fn downlink_nas(
	core: Option<&CoreSecurity>,
	count: u32,
	plain: Vec<u8>,
) -> NasPdu {
	match core {
		None => NasPdu(plain),
		Some(core) => NasPdu(security::protect(
			&plain,
			SecurityHeaderType::IntegrityProtectedAndCiphered,
			&core.kint,
			count,
			NasDirection::Downlink,
		)),
	}
}

/// Unwraps one Uplink NAS Transport, checking its MAC like the core would.
fn open_uplink(
	core: &CoreSecurity,
	count: u32,
	pdu: &NgapPdu,
) -> GmmMessage {
	let NgapPdu::InitiatingMessage(InitiatingMessage::UplinkNasTransport(transport)) = pdu else {
		panic!("uplink NAS transport expected, got {pdu:?}");
	};
	let raw = &transport.nas_pdu.0;
	let (header, inner) = security::split_secured(raw).unwrap();
	security::verify_mac(
		&core.kint,
		count,
		NasDirection::Uplink,
		header.sqn,
		inner,
		&header.mac,
	)
	.unwrap();
	GmmMessage::decode(inner).unwrap()
}

#[tokio::test]
async fn ue_registers_and_establishes_a_pdu_session() {
	let gnb = Arc::new(GnbContext::from_config(&gnb_config()).unwrap());
	let (engine, _rx) = NgapEngine::new(gnb.clone());
	let ue = UeContext::from_template(&ue_template(), &plmn(), 0).unwrap();
	let supi = ue.supi();
	assert_eq!(supi, "208930000000003");
	let mut session = UeSession::new(&gnb, ue);
	let core = core_security(&supi);
	let amf_ue_ngap_id = AmfUeNgapId(100);
	let ran_ue_ngap_id = session.call.ran_ue_ngap_id;

	// Initial UE Message carries the plain Registration Request with a SUCI.
	let initial = engine.build_initial_ue_message(&mut session).await.unwrap();
	let NgapPdu::InitiatingMessage(InitiatingMessage::InitialUeMessage(initial)) = initial else {
		panic!("initial UE message expected");
	};
	assert_eq!(initial.ran_ue_ngap_id, ran_ue_ngap_id);
	assert_eq!(initial.rrc_establishment_cause, RrcEstablishmentCause::MoSignalling);
	let registration = GmmMessage::decode(&initial.nas_pdu.0).unwrap();
	let registration = registration.as_registration_request().unwrap();
	let MobileIdentity::Suci(suci) = &registration.mobile_identity else {
		panic!("SUCI expected in the initial registration");
	};
	assert_eq!(suci.msin, "0000000003");

	// Authentication Request; the response must carry the expected RES*.
	let mut established = false;
	let challenge = NasAuthenticationRequest {
		ngksi: 0,
		abba: ABBA.to_vec(),
		rand: Some(RAND),
		autn: Some(core.autn.clone()),
	};
	let responses = engine
		.handle_downlink(
			&mut session,
			DownlinkNasTransport {
				amf_ue_ngap_id,
				ran_ue_ngap_id,
				nas_pdu: downlink_nas(None, 0, challenge.encode()),
			}
			.to_pdu(),
			&mut established,
		)
		.await
		.unwrap();
	assert_eq!(responses.len(), 1);
	let NgapPdu::InitiatingMessage(InitiatingMessage::UplinkNasTransport(transport)) =
		&responses[0]
	else {
		panic!("uplink NAS transport expected");
	};
	let response = GmmMessage::decode(&transport.nas_pdu.0).unwrap();
	assert_eq!(
		response.as_authentication_response().unwrap().res_star,
		Some(core.res_star)
	);

	// Security Mode Command: the complete comes back protected with the
	// new context, carrying IMEISV and the replayed registration request.
	let command = NasSecurityModeCommand {
		algorithms: 0x02,
		ngksi: 0,
		replayed_capability: UeSecurityCapability::nea0_nia2(),
		imeisv_requested: true,
		additional_security: None,
	};
	let frame = security::protect(
		&command.encode(),
		SecurityHeaderType::IntegrityProtectedWithNewContext,
		&core.kint,
		0,
		NasDirection::Downlink,
	);
	let responses = engine
		.handle_downlink(
			&mut session,
			DownlinkNasTransport {
				amf_ue_ngap_id,
				ran_ue_ngap_id,
				nas_pdu: NasPdu(frame),
			}
			.to_pdu(),
			&mut established,
		)
		.await
		.unwrap();
	assert_eq!(responses.len(), 1);
	let complete = open_uplink(&core, 0, &responses[0]);
	let complete = complete.as_security_mode_complete().unwrap();
	assert_eq!(complete.imeisv.as_deref(), Some("4370816125816151"));
	let replayed = complete.nas_container.as_ref().expect("forced initial NAS replay");
	assert_eq!(replayed, &initial.nas_pdu.0);

	// Registration Accept rides Initial Context Setup; the gNB answers with
	// the setup response followed by the protected Registration Complete.
	let accept = NasRegistrationAccept {
		result: 0x01,
		guti: Some(FiveGGuti {
			plmn: plmn(),
			amf_region_id: 2,
			amf_set_id: 1,
			amf_pointer: 0,
			tmsi: 0x0000_2222,
		}),
		tai_list: None,
		allowed_nssai: Some(vec![Snssai { sst: 1, sd: None }]),
		t3512: Some(GprsTimer3(0x26)),
		t3502: None,
	};
	let responses = engine
		.handle_downlink(
			&mut session,
			InitialContextSetupRequest {
				amf_ue_ngap_id,
				ran_ue_ngap_id,
				nas_pdu: Some(downlink_nas(Some(&core), 1, accept.encode().unwrap())),
			}
			.to_pdu(),
			&mut established,
		)
		.await
		.unwrap();
	assert_eq!(responses.len(), 2);
	assert!(matches!(
		responses[0],
		NgapPdu::SuccessfulOutcome(SuccessfulOutcome::InitialContextSetupResponse(_))
	));
	let complete = open_uplink(&core, 1, &responses[1]);
	assert!(complete.as_registration_complete().is_some());
	assert!(session.is_registered());
	assert_eq!(session.ue.guti.as_ref().map(|guti| guti.tmsi), Some(0x0000_2222));

	// The UE asks for its PDU session.
	let transport = engine.trigger_pdu_session(&mut session).await.unwrap();
	let request = open_uplink(&core, 2, &transport);
	let request = request.as_ul_nas_transport().unwrap();
	assert_eq!(request.dnn.as_deref(), Some("internet"));
	let gsm = GsmMessage::decode(&request.payload).unwrap();
	assert!(matches!(gsm, GsmMessage::EstablishmentRequest(_)));

	// PDU Session Resource Setup: UPF endpoint down, gNB endpoint back.
	let session_accept = NasPduSessionEstablishmentAccept {
		pdu_session_id: 1,
		pti: 1,
		selected_pdu_session_type: PDU_SESSION_TYPE_IPV4,
		selected_ssc_mode: 1,
		qos_rules: vec![0x01, 0x00, 0x06, 0x31, 0x31, 0x01, 0x01, 0xFF, 0x01],
		session_ambr: vec![0x06, 0x00, 0x64, 0x06, 0x00, 0x64],
		pdu_address: Some("10.60.0.1".parse().unwrap()),
		snssai: None,
		dnn: Some("internet".into()),
	};
	let accept_transport = NasDlNasTransport {
		payload_container_type: PAYLOAD_CONTAINER_N1_SM,
		payload: session_accept.encode(),
		pdu_session_id: Some(1),
		cause: None,
	};
	let transfer = PduSessionResourceSetupRequestTransfer {
		ul_ngu_up_tnl_information: UpTransportLayerInformation::GtpTunnel(GtpTunnel {
			transport_layer_address: TransportLayerAddress::from_ip("10.100.200.3".parse().unwrap()),
			gtp_teid: GtpTeid(1000),
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
	let responses = engine
		.handle_downlink(
			&mut session,
			PduSessionResourceSetupRequest {
				amf_ue_ngap_id,
				ran_ue_ngap_id,
				nas_pdu: None,
				setup_list: vec![PduSessionResourceSetupItemReq {
					pdu_session_id: 1,
					nas_pdu: Some(downlink_nas(Some(&core), 2, accept_transport.encode())),
					snssai: SnssaiIe { sst: 1, sd: None },
					transfer: transfer.encode_bytes().unwrap(),
				}],
			}
			.to_pdu(),
			&mut established,
		)
		.await
		.unwrap();
	assert!(established);
	assert_eq!(responses.len(), 1);
	let NgapPdu::SuccessfulOutcome(SuccessfulOutcome::PduSessionResourceSetupResponse(response)) =
		&responses[0]
	else {
		panic!("setup response expected");
	};
	let items = response.setup_list.as_ref().unwrap();
	assert_eq!(items[0].pdu_session_id, 1);
	let response_transfer =
		PduSessionResourceSetupResponseTransfer::decode_bytes(&items[0].transfer).unwrap();
	let UpTransportLayerInformation::GtpTunnel(tunnel) =
		&response_transfer.dl_qos_flow_per_tnl_information.up_tnl_information;
	assert_eq!(tunnel.gtp_teid.0, 0x100);
	assert_eq!(tunnel.transport_layer_address.to_ip(), Some("192.168.1.2".parse().unwrap()));

	assert_eq!(session.ue.pdu_ipv4, Some("10.60.0.1".parse().unwrap()));
	assert_eq!(session.call.uplink_teid, Some(1000));
	assert_eq!(session.call.peer_gtpu_addr, Some("10.100.200.3".parse().unwrap()));
	assert_eq!(session.call.downlink_teid, Some(0x100));
}

#[tokio::test]
async fn tampered_downlink_is_discarded_without_state_change() {
	let gnb = Arc::new(GnbContext::from_config(&gnb_config()).unwrap());
	let (engine, _rx) = NgapEngine::new(gnb.clone());
	let ue = UeContext::from_template(&ue_template(), &plmn(), 0).unwrap();
	let supi = ue.supi();
	let mut session = UeSession::new(&gnb, ue);
	let core = core_security(&supi);
	let amf_ue_ngap_id = AmfUeNgapId(7);

	let _ = engine.build_initial_ue_message(&mut session).await.unwrap();
	let ran_ue_ngap_id = session.call.ran_ue_ngap_id;
	let mut established = false;
	let challenge = NasAuthenticationRequest {
		ngksi: 0,
		abba: ABBA.to_vec(),
		rand: Some(RAND),
		autn: Some(core.autn.clone()),
	};
	engine
		.handle_downlink(
			&mut session,
			DownlinkNasTransport {
				amf_ue_ngap_id,
				ran_ue_ngap_id,
				nas_pdu: downlink_nas(None, 0, challenge.encode()),
			}
			.to_pdu(),
			&mut established,
		)
		.await
		.unwrap();

	// A protected Security Mode Command with one payload bit flipped fails
	// integrity; the frame is dropped and the DL COUNT does not move.
	let command = NasSecurityModeCommand {
		algorithms: 0x02,
		ngksi: 0,
		replayed_capability: UeSecurityCapability::nea0_nia2(),
		imeisv_requested: false,
		additional_security: None,
	};
	let mut frame = security::protect(
		&command.encode(),
		SecurityHeaderType::IntegrityProtectedWithNewContext,
		&core.kint,
		0,
		NasDirection::Downlink,
	);
	let last = frame.len() - 1;
	frame[last] ^= 0x01;
	let dl_count_before = session.ue.dl_count;
	let responses = engine
		.handle_downlink(
			&mut session,
			DownlinkNasTransport {
				amf_ue_ngap_id,
				ran_ue_ngap_id,
				nas_pdu: NasPdu(frame),
			}
			.to_pdu(),
			&mut established,
		)
		.await
		.unwrap();
	assert!(responses.is_empty());
	assert_eq!(session.ue.dl_count, dl_count_before);
	assert!(!session.is_registered());
}

#[tokio::test]
async fn milenage_mac_mismatch_surfaces_a_sync_failure() {
	let gnb = Arc::new(GnbContext::from_config(&gnb_config()).unwrap());
	let (engine, _rx) = NgapEngine::new(gnb.clone());
	let ue = UeContext::from_template(&ue_template(), &plmn(), 0).unwrap();
	let supi = ue.supi();
	let mut session = UeSession::new(&gnb, ue);
	let mut core = core_security(&supi);
	// Corrupt MAC-A inside AUTN.
	core.autn[15] ^= 0xFF;

	let _ = engine.build_initial_ue_message(&mut session).await.unwrap();
	let ran_ue_ngap_id = session.call.ran_ue_ngap_id;
	let mut established = false;
	let challenge = NasAuthenticationRequest {
		ngksi: 0,
		abba: ABBA.to_vec(),
		rand: Some(RAND),
		autn: Some(core.autn.clone()),
	};
	let error = engine
		.handle_downlink(
			&mut session,
			DownlinkNasTransport {
				amf_ue_ngap_id: AmfUeNgapId(7),
				ran_ue_ngap_id,
				nas_pdu: downlink_nas(None, 0, challenge.encode()),
			}
			.to_pdu(),
			&mut established,
		)
		.await
		.unwrap_err();
	assert!(error.to_string().contains("SyncFailure"));
}
