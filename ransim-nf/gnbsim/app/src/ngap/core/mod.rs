//! Per-procedure handling: each file covers one NGAP procedure the gNB
//! exercises or answers.

mod initial_context;
mod initial_ue;
mod nas_transport;
mod ng_setup;
mod pdu_session;

use gnbsim_ngap::{
	Cause,
	CauseProtocol,
	ErrorIndication,
	InitiatingMessage,
	NgapPdu,
	SuccessfulOutcome,
	ToNgapPdu,
	UnsuccessfulOutcome,
};
use tracing::{error, warn};

use super::EngineError;
use super::engine::{NgapEngine, UeSession};

impl NgapEngine {
	/// Routes one downlink PDU to its procedure handler and returns the
	/// PDUs to send back, in order.
	pub async fn handle_downlink(
		&self,
		session: &mut UeSession,
		pdu: NgapPdu,
		session_established: &mut bool,
	) -> Result<Vec<NgapPdu>, EngineError> {
		match pdu {
			NgapPdu::InitiatingMessage(InitiatingMessage::DownlinkNasTransport(transport)) => {
				self.handle_downlink_nas_transport(session, transport).await
			}
			NgapPdu::InitiatingMessage(InitiatingMessage::InitialContextSetupRequest(request)) => {
				self.handle_initial_context_setup(session, request).await
			}
			NgapPdu::InitiatingMessage(InitiatingMessage::PduSessionResourceSetupRequest(
				request,
			)) => {
				let responses = self.handle_pdu_session_setup(session, request).await?;
				if !responses.is_empty() {
					*session_established = true;
				}
				Ok(responses)
			}
			NgapPdu::InitiatingMessage(InitiatingMessage::ErrorIndication(indication)) => {
				error!(
					cause = ?indication.cause,
					diagnostic = "error indication from the core"
				);
				Err(EngineError::Protocol {
					message: "error indication from the core",
					state: session.ue.last_rcvd,
				})
			}
			NgapPdu::InitiatingMessage(InitiatingMessage::Unknown(unknown)) => {
				warn!(
					procedure_code = unknown.procedure_code,
					diagnostic = "unsupported procedure, answering with an error indication"
				);
				let indication = ErrorIndication {
					amf_ue_ngap_id: session.call.amf_ue_ngap_id,
					ran_ue_ngap_id: Some(session.call.ran_ue_ngap_id),
					cause: Some(Cause::Protocol(
						CauseProtocol::MessageNotCompatibleWithReceiverState,
					)),
				};
				Ok(vec![indication.to_pdu()])
			}
			NgapPdu::SuccessfulOutcome(SuccessfulOutcome::Unknown(unknown)) => {
				warn!(procedure_code = unknown.procedure_code, "ignoring unsolicited outcome");
				Ok(Vec::new())
			}
			NgapPdu::UnsuccessfulOutcome(UnsuccessfulOutcome::Unknown(unknown)) => {
				warn!(
					procedure_code = unknown.procedure_code,
					"ignoring unsolicited unsuccessful outcome"
				);
				Ok(Vec::new())
			}
			other => {
				warn!(pdu = ?other, "PDU out of place in the UE turn");
				Ok(Vec::new())
			}
		}
	}
}
