use gnbsim_ngap::{DownlinkNasTransport, NasPdu, NgapPdu, ToNgapPdu, UplinkNasTransport};
use tracing::warn;

use crate::nas::GmmEvent;
use crate::ngap::EngineError;
use crate::ngap::engine::{NgapEngine, UeSession};

impl NgapEngine {
	/// Downlink NAS pass-through: pair the AMF UE id, hand the NAS PDU to
	/// the UE and wrap whatever uplinks it produced.
	pub(crate) async fn handle_downlink_nas_transport(
		&self,
		session: &mut UeSession,
		transport: DownlinkNasTransport,
	) -> Result<Vec<NgapPdu>, EngineError> {
		if transport.ran_ue_ngap_id != session.call.ran_ue_ngap_id {
			warn!(
				got = transport.ran_ue_ngap_id.0,
				expected = session.call.ran_ue_ngap_id.0,
				"downlink NAS transport for a different RAN UE id"
			);
			return Ok(Vec::new());
		}
		session.call.amf_ue_ngap_id.get_or_insert(transport.amf_ue_ngap_id);
		self.feed_nas(session, &transport.nas_pdu.0).await?;
		self.wrap_uplinks(session)
	}

	/// Emits the UL NAS Transport carrying the PDU session establishment
	/// request once the UE is registered.
	pub async fn trigger_pdu_session(
		&self,
		session: &mut UeSession,
	) -> Result<NgapPdu, EngineError> {
		session.feed(GmmEvent::PduSessionTrigger).await?;
		self.wrap_uplinks(session)?
			.pop()
			.ok_or(EngineError::Protocol {
				message: "PDU session trigger produced no uplink",
				state: session.ue.last_rcvd,
			})
	}

	/// Uplink NAS PDUs travel as Uplink NAS Transport echoing both UE ids
	/// plus the current user location.
	pub(crate) fn wrap_uplinks(
		&self,
		session: &mut UeSession,
	) -> Result<Vec<NgapPdu>, EngineError> {
		let uplinks = session.drain_uplinks();
		if uplinks.is_empty() {
			return Ok(Vec::new());
		}
		let amf_ue_ngap_id = session.call.amf_ue_ngap_id.ok_or(EngineError::Protocol {
			message: "uplink NAS before the AMF UE id is known",
			state: session.ue.last_rcvd,
		})?;
		Ok(uplinks
			.into_iter()
			.map(|nas| {
				UplinkNasTransport {
					amf_ue_ngap_id,
					ran_ue_ngap_id: session.call.ran_ue_ngap_id,
					nas_pdu: NasPdu(nas),
					user_location_information: self.gnb.user_location(),
				}
				.to_pdu()
			})
			.collect())
	}
}
