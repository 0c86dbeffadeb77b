use gnbsim_nas::message::*;
use gnbsim_nas::parser::GmmMessage;
use gnbsim_nas::types::*;

fn test_suci() -> MobileIdentity {
	MobileIdentity::Suci(Suci {
		plmn: Plmn { mcc: "208".into(), mnc: "93".into() },
		routing_indicator: "0".into(),
		protection_scheme: 0,
		home_network_pki: 0,
		msin: "0000000003".into(),
	})
}

#[test]
fn registration_request_wire_layout() {
	let request = NasRegistrationRequest {
		registration_type: REGISTRATION_TYPE_INITIAL_FOLLOW_ON,
		ngksi: NGKSI_NO_KEY,
		mobile_identity: test_suci(),
		capability_5gmm: None,
		security_capability: Some(UeSecurityCapability::nea0_nia2()),
	};
	let encoded = request.encode().unwrap();
	assert_eq!(
		encoded,
		vec![
			0x7E, 0x00, 0x41, 0x79, // plain header, ngKSI=7 | initial+FOR
			0x00, 0x0D, // SUCI length
			0x01, 0x02, 0xF8, 0x39, 0xF0, 0xFF, 0x00, 0x00, // SUCI head
			0x00, 0x00, 0x00, 0x00, 0x30, // BCD MSIN 0000000003
			0x2E, 0x02, 0x80, 0x20, // UE security capability: NEA0 + NIA2
		]
	);

	let decoded = GmmMessage::decode(&encoded).unwrap();
	assert_eq!(decoded, GmmMessage::RegistrationRequest(request));
}

#[test]
fn authentication_request_round_trips() {
	let request = NasAuthenticationRequest {
		ngksi: 0,
		abba: vec![0x00, 0x00],
		rand: Some([0x23; 16]),
		autn: Some(vec![0x42; 16]),
	};
	let decoded = GmmMessage::decode(&request.encode()).unwrap();
	assert_eq!(decoded, GmmMessage::AuthenticationRequest(request));
}

#[test]
fn security_mode_command_flags_round_trip() {
	let command = NasSecurityModeCommand {
		algorithms: 0x02, // NEA0 | NIA2
		ngksi: 0,
		replayed_capability: UeSecurityCapability::nea0_nia2(),
		imeisv_requested: true,
		additional_security: Some(0x02),
	};
	let encoded = command.encode();
	let decoded = GmmMessage::decode(&encoded).unwrap();
	let decoded = decoded.as_security_mode_command().unwrap();
	assert!(decoded.imeisv_requested);
	assert!(decoded.rinmr_requested());
	assert!(!decoded.horizontal_derivation());
}

#[test]
fn security_mode_complete_carries_imeisv_and_replay() {
	let complete = NasSecurityModeComplete {
		imeisv: Some("4370816125816151".into()),
		nas_container: Some(vec![0x7E, 0x00, 0x41, 0x79]),
	};
	let decoded = GmmMessage::decode(&complete.encode().unwrap()).unwrap();
	assert_eq!(decoded, GmmMessage::SecurityModeComplete(complete));
}

#[test]
fn registration_accept_fields_round_trip() {
	let accept = NasRegistrationAccept {
		result: 0x01,
		guti: Some(FiveGGuti {
			plmn: Plmn { mcc: "208".into(), mnc: "93".into() },
			amf_region_id: 2,
			amf_set_id: 1,
			amf_pointer: 0,
			tmsi: 0x12345678,
		}),
		tai_list: Some(TaiList(vec![Tai {
			plmn: Plmn { mcc: "208".into(), mnc: "93".into() },
			tac: 1,
		}])),
		allowed_nssai: Some(vec![Snssai { sst: 1, sd: Some(0x010203) }]),
		t3512: Some(GprsTimer3(0x26)),
		t3502: Some(GprsTimer2(0x2C)),
	};
	let decoded = GmmMessage::decode(&accept.encode().unwrap()).unwrap();
	assert_eq!(decoded, GmmMessage::RegistrationAccept(accept));
}

#[test]
fn registration_accept_skips_unknown_ies() {
	let accept = NasRegistrationAccept {
		result: 0x01,
		..Default::default()
	};
	let mut encoded = accept.encode().unwrap();
	// Unknown TLV (0x44, two octets) and an unknown one-octet TV (0xB3).
	encoded.extend_from_slice(&[0x44, 0x02, 0xAA, 0xBB, 0xB3]);
	encoded.extend_from_slice(&[0x16, 0x01, 0x2C]);
	let decoded = GmmMessage::decode(&encoded).unwrap();
	let decoded = decoded.as_registration_accept().unwrap();
	assert_eq!(decoded.t3502, Some(GprsTimer2(0x2C)));
}

#[test]
fn ul_nas_transport_wraps_the_session_request() {
	let request = NasPduSessionEstablishmentRequest {
		pdu_session_id: 1,
		pti: 1,
		integrity_max_rate: [0xFF, 0xFF],
		pdu_session_type: Some(PDU_SESSION_TYPE_IPV4V6),
	};
	let transport = NasUlNasTransport {
		payload_container_type: PAYLOAD_CONTAINER_N1_SM,
		payload: request.encode(),
		pdu_session_id: Some(1),
		request_type: Some(REQUEST_TYPE_INITIAL),
		snssai: Some(Snssai { sst: 1, sd: None }),
		dnn: Some("internet".into()),
	};
	let decoded = GmmMessage::decode(&transport.encode()).unwrap();
	let decoded = decoded.as_ul_nas_transport().unwrap();
	assert_eq!(decoded.dnn.as_deref(), Some("internet"));
	assert_eq!(decoded.request_type, Some(REQUEST_TYPE_INITIAL));

	let inner = GsmMessage::decode(&decoded.payload).unwrap();
	assert_eq!(inner, GsmMessage::EstablishmentRequest(request));
}

#[test]
fn session_establishment_request_wire_layout() {
	let request = NasPduSessionEstablishmentRequest {
		pdu_session_id: 1,
		pti: 1,
		integrity_max_rate: [0xFF, 0xFF],
		pdu_session_type: Some(PDU_SESSION_TYPE_IPV4V6),
	};
	assert_eq!(request.encode(), vec![0x2E, 0x01, 0x01, 0xC1, 0xFF, 0xFF, 0x93]);
}

#[test]
fn session_establishment_accept_yields_the_pdu_address() {
	let accept = NasPduSessionEstablishmentAccept {
		pdu_session_id: 1,
		pti: 1,
		selected_pdu_session_type: PDU_SESSION_TYPE_IPV4,
		selected_ssc_mode: 1,
		qos_rules: vec![0x01, 0x00, 0x06, 0x31, 0x31, 0x01, 0x01, 0xFF, 0x01],
		session_ambr: vec![0x06, 0x00, 0x64, 0x06, 0x00, 0x64],
		pdu_address: Some("10.60.0.1".parse().unwrap()),
		snssai: Some(Snssai { sst: 1, sd: None }),
		dnn: Some("internet".into()),
	};
	let decoded = GsmMessage::decode(&accept.encode()).unwrap();
	assert_eq!(decoded, GsmMessage::EstablishmentAccept(accept));
}

#[test]
fn dl_nas_transport_round_trips() {
	let transport = NasDlNasTransport {
		payload_container_type: PAYLOAD_CONTAINER_N1_SM,
		payload: vec![0x2E, 0x01, 0x01, 0xC3],
		pdu_session_id: Some(1),
		cause: None,
	};
	let decoded = GmmMessage::decode(&transport.encode()).unwrap();
	assert_eq!(decoded, GmmMessage::DlNasTransport(transport));
}
