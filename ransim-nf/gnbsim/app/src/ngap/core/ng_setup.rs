use gnbsim_ngap::network::N2Association;
use gnbsim_ngap::{
	NgSetupRequest,
	NgapPdu,
	SuccessfulOutcome,
	ToNgapPdu,
	UnsuccessfulOutcome,
};
use tracing::{error, info};

use crate::context::ue_context::Rcvd;
use crate::ngap::EngineError;
use crate::ngap::engine::{NgapEngine, PROCEDURE_DEADLINE};

impl NgapEngine {
	/// NG Setup: announce the gNB identity and supported TAs, then wait for
	/// the response. Nothing in it carries semantics for the simulator
	/// beyond the log line.
	pub(crate) async fn ng_setup(
		&self,
		assoc: &N2Association,
	) -> Result<(), EngineError> {
		let request = NgSetupRequest {
			global_ran_node_id: self.gnb.global_ran_node_id(),
			ran_node_name: None,
			supported_ta_list: self.gnb.supported_ta_list.clone(),
			default_paging_drx: self.gnb.default_paging_drx,
		};
		self.send_pdu(request.to_pdu()).await?;

		match self.receive(assoc, "NG Setup", PROCEDURE_DEADLINE, Rcvd::Null).await? {
			NgapPdu::SuccessfulOutcome(SuccessfulOutcome::NgSetupResponse(response)) => {
				info!(
					amf_name = response.amf_name.as_deref(),
					relative_capacity = response.relative_amf_capacity,
					"NG setup complete"
				);
				Ok(())
			}
			NgapPdu::UnsuccessfulOutcome(UnsuccessfulOutcome::NgSetupFailure(failure)) => {
				error!(cause = ?failure.cause, "NG setup rejected");
				Err(EngineError::Protocol {
					message: "NG setup rejected by the core",
					state: Rcvd::Null,
				})
			}
			other => {
				error!(pdu = ?other, "unexpected answer to NG setup");
				Err(EngineError::Protocol {
					message: "unexpected answer to NG setup",
					state: Rcvd::Null,
				})
			}
		}
	}
}
