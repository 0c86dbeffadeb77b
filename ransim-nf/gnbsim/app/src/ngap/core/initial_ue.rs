use gnbsim_ngap::{InitialUeMessage, NasPdu, NgapPdu, RrcEstablishmentCause, ToNgapPdu};

use crate::nas::GmmEvent;
use crate::ngap::EngineError;
use crate::ngap::engine::{NgapEngine, UeSession};

impl NgapEngine {
	/// Triggers the UE's Registration Request and wraps it into the
	/// Initial UE Message that opens the call.
	pub async fn build_initial_ue_message(
		&self,
		session: &mut UeSession,
	) -> Result<NgapPdu, EngineError> {
		session.feed(GmmEvent::RegistrationTrigger).await?;
		let nas_pdu = session
			.drain_uplinks()
			.pop()
			.ok_or(EngineError::Protocol {
				message: "registration trigger produced no uplink",
				state: session.ue.last_rcvd,
			})?;
		let message = InitialUeMessage {
			ran_ue_ngap_id: session.call.ran_ue_ngap_id,
			nas_pdu: NasPdu(nas_pdu),
			user_location_information: self.gnb.user_location(),
			rrc_establishment_cause: RrcEstablishmentCause::MoSignalling,
			ue_context_request: true,
		};
		Ok(message.to_pdu())
	}
}
