//! Builders for the uplink NAS messages of the registration and PDU session
//! procedures.

use gnbsim_nas::message::*;
use gnbsim_nas::types::UeSecurityCapability;

use super::{NasBuilder, NasContext, NasEngineError, UeContext};

impl NasBuilder for NasRegistrationRequest {
	fn build(
		_nas_context: &NasContext,
		ue_context: &UeContext,
	) -> Result<Self, NasEngineError> {
		Ok(Self {
			registration_type: REGISTRATION_TYPE_INITIAL_FOLLOW_ON,
			ngksi: NGKSI_NO_KEY,
			mobile_identity: ue_context.suci(),
			capability_5gmm: None,
			security_capability: Some(UeSecurityCapability::nea0_nia2()),
		})
	}
}

impl NasBuilder for NasAuthenticationResponse {
	fn build(
		nas_context: &NasContext,
		_ue_context: &UeContext,
	) -> Result<Self, NasEngineError> {
		let res_star = nas_context
			.res_star
			.ok_or(NasEngineError::MissingIe("RES* has not been derived"))?;
		Ok(Self { res_star: Some(res_star) })
	}
}

impl NasBuilder for NasSecurityModeComplete {
	fn build(
		nas_context: &NasContext,
		ue_context: &UeContext,
	) -> Result<Self, NasEngineError> {
		let nas_container = if ue_context.rinmr_requested {
			Some(
				nas_context
					.registration_request
					.clone()
					.ok_or(NasEngineError::MissingIe("no registration request to replay"))?,
			)
		} else {
			None
		};
		Ok(Self {
			imeisv: ue_context.imeisv_requested.then(|| ue_context.imeisv.clone()),
			nas_container,
		})
	}
}

impl NasBuilder for NasRegistrationComplete {
	fn build(
		_nas_context: &NasContext,
		_ue_context: &UeContext,
	) -> Result<Self, NasEngineError> {
		Ok(Self {})
	}
}

/// UL NAS Transport carrying the 5GSM PDU Session Establishment Request for
/// the configured DNN and slice.
impl NasBuilder for NasUlNasTransport {
	fn build(
		_nas_context: &NasContext,
		ue_context: &UeContext,
	) -> Result<Self, NasEngineError> {
		let request = NasPduSessionEstablishmentRequest {
			pdu_session_id: ue_context.pdu_session_id,
			pti: 1,
			integrity_max_rate: [0xFF, 0xFF],
			pdu_session_type: Some(PDU_SESSION_TYPE_IPV4V6),
		};
		Ok(Self {
			payload_container_type: PAYLOAD_CONTAINER_N1_SM,
			payload: request.encode(),
			pdu_session_id: Some(ue_context.pdu_session_id),
			request_type: Some(REQUEST_TYPE_INITIAL),
			snssai: Some(ue_context.snssai),
			dnn: Some(ue_context.dnn.clone()),
		})
	}
}
