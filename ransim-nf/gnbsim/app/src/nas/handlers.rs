//! Handlers for the downlink NAS messages that drive the UE forward. Each
//! handler updates the UE context and queues the answering uplink.

use gnbsim_nas::message::*;
use gnbsim_nas::security::kdf::{
	ALGORITHM_TYPE_NAS_ENC,
	ALGORITHM_TYPE_NAS_INT,
	derive_algorithm_key,
	derive_kamf,
	derive_kausf,
	derive_kseaf,
	derive_res_star,
};
use gnbsim_nas::security::milenage::Milenage;
use gnbsim_nas::security::SecurityHeaderType;
use tracing::{debug, info};

use super::{NasBuilder, NasContext, NasEngineError, NasHandler, UeContext};
use crate::context::ue_context::SecurityKeys;

/// NEA0 is the only ciphering algorithm, NIA2 the only integrity algorithm.
const NEA0: u8 = 0;
const NIA2: u8 = 2;

impl NasHandler for NasAuthenticationRequest {
	async fn handle(
		&self,
		nas_context: &mut NasContext,
		ue_context: &mut UeContext,
	) -> Result<(), NasEngineError> {
		let rand = self.rand.as_ref().ok_or(NasEngineError::MissingIe("RAND"))?;
		let autn = self.autn.as_ref().ok_or(NasEngineError::MissingIe("AUTN"))?;
		if autn.len() != 16 {
			return Err(NasEngineError::MissingIe("AUTN of sixteen octets"));
		}
		let sqn_xor_ak: [u8; 6] = autn[..6].try_into().expect("6 octets");
		let amf: [u8; 2] = autn[6..8].try_into().expect("2 octets");
		let received_mac: [u8; 8] = autn[8..].try_into().expect("8 octets");

		let milenage = Milenage::new(&ue_context.k, &ue_context.opc);
		let (res, ck, ik, ak) = milenage.f2345(rand);
		let mut sqn = sqn_xor_ak;
		for (byte, mask) in sqn.iter_mut().zip(&ak) {
			*byte ^= mask;
		}
		let calculated = milenage.f1(rand, &sqn, &amf);
		if calculated != received_mac {
			return Err(NasEngineError::SyncFailure {
				received: received_mac,
				calculated,
			});
		}

		let snn = ue_context.serving_network.clone();
		let res_star = derive_res_star(&ck, &ik, &snn, rand, &res);
		let kausf = derive_kausf(&ck, &ik, &snn, &sqn_xor_ak);
		let kseaf = derive_kseaf(&kausf, &snn);
		let kamf = derive_kamf(&kseaf, &ue_context.supi(), &self.abba);
		let kenc = derive_algorithm_key(&kamf, ALGORITHM_TYPE_NAS_ENC, NEA0);
		let kint = derive_algorithm_key(&kamf, ALGORITHM_TYPE_NAS_INT, NIA2);
		ue_context.keys = Some(SecurityKeys { kausf, kseaf, kamf, kenc, kint });
		nas_context.res_star = Some(res_star);
		debug!(supi = %ue_context.supi(), "5G-AKA succeeded, key hierarchy derived");

		// The response goes out before security activation, as a plain frame.
		let response = NasAuthenticationResponse::build(nas_context, ue_context)?;
		ue_context.pending_uplinks.push_back(response.encode());
		Ok(())
	}
}

impl NasHandler for NasSecurityModeCommand {
	async fn handle(
		&self,
		nas_context: &mut NasContext,
		ue_context: &mut UeContext,
	) -> Result<(), NasEngineError> {
		ue_context.imeisv_requested = self.imeisv_requested;
		ue_context.rinmr_requested =
			self.rinmr_requested() || ue_context.force_initial_nas_replay;
		debug!(
			imeisv = ue_context.imeisv_requested,
			rinmr = ue_context.rinmr_requested,
			algorithms = self.algorithms,
			"security mode command accepted"
		);
		let complete = NasSecurityModeComplete::build(nas_context, ue_context)?;
		let plain = complete.encode()?;
		let frame = ue_context.seal_uplink(
			plain,
			SecurityHeaderType::IntegrityProtectedAndCipheredWithNewContext,
		);
		ue_context.pending_uplinks.push_back(frame);
		Ok(())
	}
}

impl NasHandler for NasRegistrationAccept {
	async fn handle(
		&self,
		nas_context: &mut NasContext,
		ue_context: &mut UeContext,
	) -> Result<(), NasEngineError> {
		ue_context.registration_result = Some(self.result);
		ue_context.guti = self.guti.clone();
		ue_context.tai_list = self.tai_list.clone();
		ue_context.allowed_nssai = self.allowed_nssai.clone();
		ue_context.t3512 = self.t3512;
		ue_context.t3502 = self.t3502;
		info!(
			supi = %ue_context.supi(),
			guti = ?ue_context.guti,
			t3512 = ?self.t3512.and_then(|t| t.to_duration()),
			"registration accepted"
		);
		let complete = NasRegistrationComplete::build(nas_context, ue_context)?;
		let frame = ue_context
			.seal_uplink(complete.encode(), SecurityHeaderType::IntegrityProtectedAndCiphered);
		ue_context.pending_uplinks.push_back(frame);
		Ok(())
	}
}

impl NasHandler for NasDlNasTransport {
	async fn handle(
		&self,
		_nas_context: &mut NasContext,
		ue_context: &mut UeContext,
	) -> Result<(), NasEngineError> {
		let message = GsmMessage::decode(&self.payload)?;
		match message {
			GsmMessage::EstablishmentAccept(accept) => {
				ue_context.pdu_ipv4 = accept.pdu_address;
				info!(
					supi = %ue_context.supi(),
					pdu_session_id = accept.pdu_session_id,
					address = ?accept.pdu_address,
					dnn = accept.dnn.as_deref(),
					"PDU session established"
				);
			}
			GsmMessage::EstablishmentRequest(_) => {
				return Err(NasEngineError::Protocol {
					message: "5GSM establishment request on the downlink",
					state: ue_context.last_rcvd,
				});
			}
		}
		Ok(())
	}
}
