//! The N3 datapath: per tunnel, one task reads plaintext IP from the tunnel
//! device and emits GTP-U, the other decapsulates UDP and writes the inner
//! packet back to the device.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxBuildHasher;
use scc::hash_map::HashMap as SccHashMap;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::codec::{GtpuMessage, decap, encap_tpdu, encode_echo_response};
use super::GTPU_PORT;

const MAX_DATAGRAM: usize = 65536;

/// Boundary to the kernel tunnel interface; device creation and routing are
/// the host's business.
#[async_trait]
pub trait TunnelDevice: Send + Sync {
	async fn read_packet(
		&self,
		buf: &mut [u8],
	) -> io::Result<usize>;

	async fn write_packet(
		&self,
		packet: &[u8],
	) -> io::Result<()>;
}

/// Endpoints agreed for one PDU session.
#[derive(Debug, Clone)]
pub struct GtpuTunnel {
	/// TEID the UPF expects on uplink T-PDUs.
	pub uplink_teid: u32,
	/// Locally allocated TEID downlink T-PDUs arrive on.
	pub downlink_teid: u32,
	pub peer: SocketAddr,
	pub qos_flow_id: u8,
}

struct TunnelEntry {
	device: Arc<dyn TunnelDevice>,
}

/// One UDP/2152 socket shared by every tunnel, with downlink dispatch on
/// the TEID.
pub struct GtpuDatapath {
	socket: Arc<UdpSocket>,
	tunnels: SccHashMap<u32, TunnelEntry, FxBuildHasher>,
}

impl GtpuDatapath {
	pub async fn bind(addr: IpAddr) -> io::Result<Self> {
		let socket = UdpSocket::bind(SocketAddr::new(addr, GTPU_PORT)).await?;
		info!(local = %socket.local_addr()?, "GTP-U datapath bound");
		Ok(Self {
			socket: Arc::new(socket),
			tunnels: SccHashMap::with_hasher(FxBuildHasher::default()),
		})
	}

	/// Installs one tunnel: registers the downlink TEID and spawns the
	/// uplink task reading the device.
	pub async fn install_tunnel(
		self: &Arc<Self>,
		tunnel: GtpuTunnel,
		device: Arc<dyn TunnelDevice>,
		cancel: CancellationToken,
	) {
		let _ = self
			.tunnels
			.insert_async(tunnel.downlink_teid, TunnelEntry { device: device.clone() })
			.await;
		let socket = self.socket.clone();
		tokio::spawn(async move {
			if let Err(e) = uplink_loop(socket, tunnel, device, cancel).await {
				error!(diagnostic = "uplink tunnel task failed", error = %e);
			}
		});
	}

	/// The downlink task: decapsulate every datagram on UDP/2152 and hand
	/// the inner packet to the owning device. Echo requests are answered in
	/// place; malformed datagrams are logged and dropped.
	pub async fn run_downlink(
		&self,
		cancel: CancellationToken,
	) -> io::Result<()> {
		let mut buf = vec![0u8; MAX_DATAGRAM];
		loop {
			let (len, from) = tokio::select! {
				biased;

				received = self.socket.recv_from(&mut buf) => received?,

				_ = cancel.cancelled() => {
					debug!("GTP-U downlink task cancelled");
					return Ok(());
				}
			};
			match decap(&buf[..len]) {
				Ok(GtpuMessage::Tpdu { teid, payload }) => {
					let device = self
						.tunnels
						.read_async(&teid, |_, entry| entry.device.clone())
						.await;
					match device {
						Some(device) => {
							if let Err(e) = device.write_packet(payload).await {
								error!(teid, error = %e, "tunnel device write failed");
							}
						}
						None => warn!(teid, "T-PDU for an unknown downlink TEID"),
					}
				}
				Ok(GtpuMessage::EchoRequest { sequence }) => {
					debug!(%from, ?sequence, "answering GTP-U echo");
					let response = encode_echo_response(sequence);
					if let Err(e) = self.socket.send_to(&response, from).await {
						error!(error = %e, "echo response send failed");
					}
				}
				Ok(GtpuMessage::Other { message_type, teid }) => {
					warn!(message_type, teid, "ignoring unhandled GTP-U message");
				}
				Err(e) => {
					error!(
						error = %e,
						pdu = faster_hex::hex_string(&buf[..len.min(64)]),
						"discarding malformed GTP-U datagram"
					);
				}
			}
		}
	}
}

async fn uplink_loop(
	socket: Arc<UdpSocket>,
	tunnel: GtpuTunnel,
	device: Arc<dyn TunnelDevice>,
	cancel: CancellationToken,
) -> io::Result<()> {
	let mut buf = vec![0u8; MAX_DATAGRAM];
	loop {
		let len = tokio::select! {
			biased;

			read = device.read_packet(&mut buf) => read?,

			_ = cancel.cancelled() => {
				debug!("GTP-U uplink task cancelled");
				return Ok(());
			}
		};
		if len == 0 {
			return Ok(());
		}
		let frame = encap_tpdu(tunnel.uplink_teid, tunnel.qos_flow_id, &buf[..len]);
		socket.send_to(&frame, tunnel.peer).await?;
	}
}
