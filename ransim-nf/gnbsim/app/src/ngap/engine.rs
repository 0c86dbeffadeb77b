//! The engine proper: one sender task feeding the ordered N2 stream, a
//! receive loop bounded by per-procedure deadlines, and the per-UE turn
//! driving NAS.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use gnbsim_ngap::network::N2Association;
use gnbsim_ngap::{NgapPdu, codec_to_bytes, decode_ngap_pdu};
use statig::awaitable::{IntoStateMachineExt, StateMachine};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, warn};

use super::EngineError;
use crate::config::Configuration;
use crate::context::{GnbContext, UeCallContext, UeContext};
use crate::nas::gmm::GmmEvent;
use crate::nas::{NasContext, NasEngineError};

/// Default per-procedure receive deadline.
pub(crate) const PROCEDURE_DEADLINE: Duration = Duration::from_secs(5);
/// Window after Registration Complete in which a Configuration Update
/// Command may arrive.
const CONFIGURATION_UPDATE_WINDOW: Duration = Duration::from_secs(3);
/// Outgoing PDUs queued towards the sender task.
const SEND_QUEUE_DEPTH: usize = 64;

/// One UE being driven through registration: its NAS machine, session
/// context and the gNB call context.
pub struct UeSession {
	pub machine: StateMachine<NasContext>,
	pub ue: UeContext,
	pub call: UeCallContext,
}

impl UeSession {
	pub fn new(
		gnb: &GnbContext,
		ue: UeContext,
	) -> Self {
		Self {
			machine: NasContext::new().state_machine(),
			ue,
			call: UeCallContext::new(gnb.allocate_ran_ue_id()),
		}
	}

	/// REGISTERED is entered when the accept is processed and the complete
	/// queued, so the recorded registration result is the authoritative
	/// signal.
	pub fn is_registered(&self) -> bool {
		self.ue.registration_result.is_some()
	}

	/// Feeds one event through the 5GMM machine and surfaces any error a
	/// handler parked on the context.
	pub async fn feed(
		&mut self,
		event: GmmEvent,
	) -> Result<(), NasEngineError> {
		self.machine.handle_with_context(&event, &mut self.ue).await;
		match self.ue.procedure_error.take() {
			Some(error) => Err(error),
			None => Ok(()),
		}
	}

	pub fn drain_uplinks(&mut self) -> Vec<Vec<u8>> {
		self.ue.pending_uplinks.drain(..).collect()
	}
}

/// What a completed UE turn hands to the user plane.
#[derive(Debug, Clone)]
pub struct EstablishedSession {
	pub supi: String,
	pub pdu_session_id: u8,
	pub ue_ipv4: Option<std::net::Ipv4Addr>,
	pub uplink_teid: u32,
	pub downlink_teid: u32,
	pub peer_gtpu_addr: IpAddr,
	pub qos_flow_id: u8,
}

pub struct NgapEngine {
	pub(crate) gnb: Arc<GnbContext>,
	tx: mpsc::Sender<Bytes>,
}

impl NgapEngine {
	pub fn new(gnb: Arc<GnbContext>) -> (Self, mpsc::Receiver<Bytes>) {
		let (tx, rx) = mpsc::channel(SEND_QUEUE_DEPTH);
		(Self { gnb, tx }, rx)
	}

	/// The sender task: the single writer of the N2 stream, so the core
	/// observes every UE's PDUs in send order.
	pub fn spawn_sender(
		assoc: Arc<N2Association>,
		mut rx: mpsc::Receiver<Bytes>,
		cancel: CancellationToken,
	) -> tokio::task::JoinHandle<()> {
		tokio::spawn(async move {
			loop {
				tokio::select! {
				biased;

				message = rx.recv() => {
					match message {
						Some(bytes) => {
							if let Err(e) = assoc.write_pdu(bytes).await {
								error!(diagnostic = "N2 write failed", error = ?e);
								break;
							}
						}
						None => break,
					}
				}

				_ = cancel.cancelled() => {
					debug!("sender task cancelled");
					break;
				}}
			}
		})
	}

	pub async fn send_pdu(
		&self,
		pdu: NgapPdu,
	) -> Result<(), EngineError> {
		let bytes = codec_to_bytes(&pdu)?;
		self.tx
			.send(bytes.into())
			.await
			.map_err(|_| EngineError::Closed("send queue"))?;
		Ok(())
	}

	pub(crate) async fn receive(
		&self,
		assoc: &N2Association,
		procedure: &'static str,
		deadline: Duration,
		state: crate::context::ue_context::Rcvd,
	) -> Result<NgapPdu, EngineError> {
		loop {
			let read = timeout(deadline, assoc.read_pdu())
				.await
				.map_err(|_| EngineError::Timeout { procedure, state })?;
			let Some(bytes) = read.map_err(EngineError::Tnla)? else {
				return Err(EngineError::Closed(procedure));
			};
			match decode_ngap_pdu(&bytes) {
				Ok(pdu) => return Ok(pdu),
				Err(e) => {
					// Malformed downlink: log with the offending octets and
					// discard without touching any state.
					error!(
						diagnostic = "discarding undecodable NGAP PDU",
						error = %e,
						pdu = faster_hex::hex_string(&bytes),
					);
				}
			}
		}
	}

	/// Runs the whole simulation on an established association: NG Setup,
	/// then each UE in its own cooperative turn.
	pub async fn run(
		&self,
		assoc: &N2Association,
		configuration: &Configuration,
	) -> Result<Vec<EstablishedSession>, EngineError> {
		self.ng_setup(assoc).await?;

		let mut established = Vec::with_capacity(configuration.ue.count as usize);
		for index in 0..configuration.ue.count {
			let ue = UeContext::from_template(&configuration.ue, &self.gnb.plmn, index)
				.map_err(NasEngineError::from)?;
			let supi = ue.supi();
			let mut session = UeSession::new(&self.gnb, ue);
			let outcome = self
				.run_ue(assoc, &mut session)
				.instrument(tracing::info_span!("ue", supi = %supi))
				.await;
			let ran_ue_ngap_id = session.call.ran_ue_ngap_id;
			let _ = self
				.gnb
				.call_contexts
				.insert_async(ran_ue_ngap_id, session.call.clone())
				.await;
			match outcome {
				Ok(done) => established.push(done),
				Err(e) => {
					error!(supi = %supi, diagnostic = "UE procedure failed", error = %e);
					return Err(e);
				}
			}
		}
		Ok(established)
	}

	/// One UE's registration plus PDU session establishment, strictly
	/// ordered: every downlink is consumed before the next uplink goes out.
	pub(crate) async fn run_ue(
		&self,
		assoc: &N2Association,
		session: &mut UeSession,
	) -> Result<EstablishedSession, EngineError> {
		let initial = self.build_initial_ue_message(session).await?;
		self.send_pdu(initial).await?;

		let mut session_established = false;
		let mut pdu_session_requested = false;
		while !(session.is_registered() && session_established) {
			let pdu = self
				.receive(assoc, "registration", PROCEDURE_DEADLINE, session.ue.last_rcvd)
				.await?;
			let responses = self.handle_downlink(session, pdu, &mut session_established).await?;
			for response in responses {
				self.send_pdu(response).await?;
			}

			if session.is_registered() && !pdu_session_requested {
				self.configuration_update_window(assoc, session).await?;
				let transport = self.trigger_pdu_session(session).await?;
				self.send_pdu(transport).await?;
				pdu_session_requested = true;
			}
		}

		let call = &session.call;
		info!(
			ran_ue_ngap_id = call.ran_ue_ngap_id.0,
			amf_ue_ngap_id = call.amf_ue_ngap_id.map(|id| id.0),
			ip = ?session.ue.pdu_ipv4,
			"UE registered with an established PDU session"
		);
		Ok(EstablishedSession {
			supi: session.ue.supi(),
			pdu_session_id: session.ue.pdu_session_id,
			ue_ipv4: session.ue.pdu_ipv4,
			uplink_teid: call.uplink_teid.ok_or(EngineError::Protocol {
				message: "session established without an uplink TEID",
				state: session.ue.last_rcvd,
			})?,
			downlink_teid: call.downlink_teid.ok_or(EngineError::Protocol {
				message: "session established without a downlink TEID",
				state: session.ue.last_rcvd,
			})?,
			peer_gtpu_addr: call.peer_gtpu_addr.ok_or(EngineError::Protocol {
				message: "session established without a peer GTP-U address",
				state: session.ue.last_rcvd,
			})?,
			qos_flow_id: call.qos_flow_id,
		})
	}

	/// After Registration Complete some cores follow up with a
	/// Configuration Update Command; the window is short and silence is
	/// fine.
	async fn configuration_update_window(
		&self,
		assoc: &N2Association,
		session: &mut UeSession,
	) -> Result<(), EngineError> {
		match self
			.receive(assoc, "configuration update", CONFIGURATION_UPDATE_WINDOW, session.ue.last_rcvd)
			.await
		{
			Ok(pdu) => {
				let mut ignored = false;
				let responses = self.handle_downlink(session, pdu, &mut ignored).await?;
				for response in responses {
					self.send_pdu(response).await?;
				}
				Ok(())
			}
			Err(EngineError::Timeout { .. }) => {
				debug!("no configuration update within the window");
				Ok(())
			}
			Err(e) => Err(e),
		}
	}

	/// Feeds a downlink NAS PDU to the UE, treating integrity and decode
	/// failures as discards: logged, no state advanced.
	pub(crate) async fn feed_nas(
		&self,
		session: &mut UeSession,
		raw: &[u8],
	) -> Result<(), EngineError> {
		let message = match session.ue.open_downlink(raw) {
			Ok(message) => message,
			Err(error @ (NasEngineError::Integrity { .. } | NasEngineError::Decode(_))) => {
				warn!(
					diagnostic = "discarding downlink NAS PDU",
					error = %error,
					pdu = faster_hex::hex_string(raw),
				);
				return Ok(());
			}
			Err(error) => return Err(error.into()),
		};
		session.feed(GmmEvent::Downlink(message)).await?;
		Ok(())
	}
}
