use gnbsim_ngap::transfer::{
	AssociatedQosFlowItem,
	PduSessionResourceSetupRequestTransfer,
	PduSessionResourceSetupResponseTransfer,
	QosFlowPerTnlInformation,
};
use gnbsim_ngap::{
	GtpTeid,
	GtpTunnel,
	NgapPdu,
	PduSessionResourceSetupItemRes,
	PduSessionResourceSetupRequest,
	PduSessionResourceSetupResponse,
	ToNgapPdu,
	TransportLayerAddress,
	UpTransportLayerInformation,
};
use tracing::{error, info, warn};

use crate::ngap::EngineError;
use crate::ngap::engine::{NgapEngine, UeSession};

impl NgapEngine {
	/// PDU Session Resource Setup: capture the uplink tunnel endpoint from
	/// each item's transfer, allocate the downlink TEID, deliver the NAS
	/// payload and answer with the gNB-side tunnel.
	pub(crate) async fn handle_pdu_session_setup(
		&self,
		session: &mut UeSession,
		request: PduSessionResourceSetupRequest,
	) -> Result<Vec<NgapPdu>, EngineError> {
		if request.ran_ue_ngap_id != session.call.ran_ue_ngap_id {
			warn!(
				got = request.ran_ue_ngap_id.0,
				expected = session.call.ran_ue_ngap_id.0,
				"PDU session setup for a different RAN UE id"
			);
			return Ok(Vec::new());
		}
		session.call.amf_ue_ngap_id.get_or_insert(request.amf_ue_ngap_id);
		if let Some(nas_pdu) = &request.nas_pdu {
			self.feed_nas(session, &nas_pdu.0).await?;
		}

		let mut items = Vec::with_capacity(request.setup_list.len());
		for item in &request.setup_list {
			let transfer = match PduSessionResourceSetupRequestTransfer::decode_bytes(&item.transfer)
			{
				Ok(transfer) => transfer,
				Err(e) => {
					error!(
						diagnostic = "discarding undecodable setup request transfer",
						error = %e,
						transfer = faster_hex::hex_string(&item.transfer),
					);
					return Ok(Vec::new());
				}
			};
			let UpTransportLayerInformation::GtpTunnel(tunnel) = &transfer.ul_ngu_up_tnl_information;
			let Some(peer_addr) = tunnel.transport_layer_address.to_ip() else {
				error!(
					bit_len = tunnel.transport_layer_address.bit_len,
					diagnostic = "discarding setup with a non-IP transport layer address"
				);
				return Ok(Vec::new());
			};

			let qos_flow_id = transfer
				.qos_flows
				.first()
				.map(|flow| flow.qos_flow_identifier.0)
				.unwrap_or_default();
			let downlink_teid = self.gnb.allocate_teid();
			session.call.pdu_session_id = Some(item.pdu_session_id);
			session.call.uplink_teid = Some(tunnel.gtp_teid.0);
			session.call.peer_gtpu_addr = Some(peer_addr);
			session.call.downlink_teid = Some(downlink_teid);
			session.call.qos_flow_id = qos_flow_id;
			info!(
				pdu_session_id = item.pdu_session_id,
				uplink_teid = tunnel.gtp_teid.0,
				downlink_teid,
				peer = %peer_addr,
				session_type = ?transfer.pdu_session_type,
				"N3 tunnel endpoints agreed"
			);

			if let Some(nas_pdu) = &item.nas_pdu {
				self.feed_nas(session, &nas_pdu.0).await?;
			}

			let response_transfer = PduSessionResourceSetupResponseTransfer {
				dl_qos_flow_per_tnl_information: QosFlowPerTnlInformation {
					up_tnl_information: UpTransportLayerInformation::GtpTunnel(GtpTunnel {
						transport_layer_address: TransportLayerAddress::from_ip(self.gnb.gtpu_addr),
						gtp_teid: GtpTeid(downlink_teid),
					}),
					associated_qos_flows: transfer
						.qos_flows
						.iter()
						.map(|flow| AssociatedQosFlowItem {
							qos_flow_identifier: flow.qos_flow_identifier,
						})
						.collect(),
				},
			};
			items.push(PduSessionResourceSetupItemRes {
				pdu_session_id: item.pdu_session_id,
				transfer: response_transfer.encode_bytes()?,
			});
		}

		let response = PduSessionResourceSetupResponse {
			amf_ue_ngap_id: request.amf_ue_ngap_id,
			ran_ue_ngap_id: session.call.ran_ue_ngap_id,
			setup_list: Some(items),
		};
		let mut responses = vec![response.to_pdu()];
		responses.extend(self.wrap_uplinks(session)?);
		Ok(responses)
	}
}
