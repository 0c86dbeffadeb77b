use gnbsim_ngap::{InitialContextSetupRequest, InitialContextSetupResponse, NgapPdu, ToNgapPdu};
use tracing::{debug, warn};

use crate::ngap::EngineError;
use crate::ngap::engine::{NgapEngine, UeSession};

impl NgapEngine {
	/// Initial Context Setup usually delivers the Registration Accept. The
	/// response is sent first so the core sees the context up before the
	/// Registration Complete rides the uplink transport.
	pub(crate) async fn handle_initial_context_setup(
		&self,
		session: &mut UeSession,
		request: InitialContextSetupRequest,
	) -> Result<Vec<NgapPdu>, EngineError> {
		if request.ran_ue_ngap_id != session.call.ran_ue_ngap_id {
			warn!(
				got = request.ran_ue_ngap_id.0,
				expected = session.call.ran_ue_ngap_id.0,
				"initial context setup for a different RAN UE id"
			);
			return Ok(Vec::new());
		}
		session.call.amf_ue_ngap_id.get_or_insert(request.amf_ue_ngap_id);
		debug!(amf_ue_ngap_id = request.amf_ue_ngap_id.0, "initial context setup");

		if let Some(nas_pdu) = &request.nas_pdu {
			self.feed_nas(session, &nas_pdu.0).await?;
		}

		let response = InitialContextSetupResponse {
			amf_ue_ngap_id: request.amf_ue_ngap_id,
			ran_ue_ngap_id: session.call.ran_ue_ngap_id,
			pdu_session_setup_list: None,
		};
		let mut responses = vec![response.to_pdu()];
		responses.extend(self.wrap_uplinks(session)?);
		Ok(responses)
	}
}
