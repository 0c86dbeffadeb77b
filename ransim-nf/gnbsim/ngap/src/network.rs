//! N2 transport: one SCTP association towards the AMF, carrying NGAP with
//! PPID 60 on an ordered stream. The peer is treated as a reliable,
//! message-oriented byte stream; every read returns one whole PDU.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use bytes::{Bytes, BytesMut};
use counter::CounterUsize;
use socket2::Domain;
use tokio_sctp::{SctpSocket, SctpStream, SendOptions};
use tracing::{info, warn};

use crate::error::{NetworkError, TnlaError};

const READ_BUFFER_SIZE: usize = 8192;
const NGAP_PPID: u32 = 60;

// Unique IDs for association-scoped tracing spans.
static N2_ASSOCIATION_COUNTER: CounterUsize = CounterUsize::new();

#[derive(Debug)]
pub struct N2Association {
	pub id: usize,
	pub local_addr: SocketAddr,
	pub remote_addr: SocketAddr,
	stream: SctpStream,
}

impl N2Association {
	/// Connects to the first of the configured AMF endpoints. Additional
	/// addresses of a multi-homed peer are accepted in configuration but the
	/// association is established towards the primary path only.
	pub async fn connect(
		peers: &[SocketAddr],
		local_port: Option<u16>,
	) -> Result<Self, NetworkError> {
		let peer = *peers.first().ok_or(NetworkError::NoPeerAddress)?;
		if peers.len() > 1 {
			warn!(
				ignored = peers.len() - 1,
				"multi-homed N2 peer configured; connecting to the primary address only"
			);
		}
		let domain = match peer.ip() {
			IpAddr::V4(_) => Domain::IPV4,
			IpAddr::V6(_) => Domain::IPV6,
		};
		let socket = SctpSocket::new(domain).map_err(NetworkError::SocketCreationError)?;
		socket
			.set_nodelay(true)
			.map_err(NetworkError::SctpSocketConfigurationError)?;
		if let Some(port) = local_port {
			let local_ip: IpAddr = match peer.ip() {
				IpAddr::V4(_) => Ipv4Addr::UNSPECIFIED.into(),
				IpAddr::V6(_) => Ipv6Addr::UNSPECIFIED.into(),
			};
			let local = SocketAddr::new(local_ip, port);
			socket
				.bind(local)
				.map_err(|e| NetworkError::LocalBindError(local, e))?;
		}
		let stream = socket
			.connect(peer)
			.await
			.map_err(|e| NetworkError::ConnectError(peer, e))?;

		let local_addr = stream
			.local_addr()
			.map_err(|e| NetworkError::TnlaCreationError(TnlaError::LocalAddressError(e)))?;
		let remote_addr = stream
			.peer_addr()
			.map_err(|e| NetworkError::TnlaCreationError(TnlaError::RemoteAddressError(e)))?;
		let id = N2_ASSOCIATION_COUNTER.increment();
		info!(id, %local_addr, %remote_addr, "N2 association established");

		Ok(Self { id, local_addr, remote_addr, stream })
	}

	/// Reads one NGAP PDU from the association.
	///
	/// # Returns
	/// - `Ok(Some(Bytes))` - one whole SCTP message
	/// - `Ok(None)` - the peer closed its end of the association
	/// - `Err(TnlaError)` - transport failure
	pub async fn read_pdu(&self) -> Result<Option<Bytes>, TnlaError> {
		let mut buf = BytesMut::with_capacity(READ_BUFFER_SIZE);
		let (n, _, _) = self
			.stream
			.recvmsg_eor_buf(&mut buf)
			.await
			.map_err(TnlaError::ReadError)?;
		if n == 0 {
			Ok(None)
		} else {
			Ok(Some(buf.freeze()))
		}
	}

	pub async fn write_pdu(
		&self,
		data: Bytes,
	) -> Result<(), TnlaError> {
		let send_options = SendOptions {
			ppid: NGAP_PPID,
			..Default::default()
		};
		// Stream 0 keeps per-UE PDUs totally ordered towards the core.
		self.stream
			.sendmsg(data.as_ref(), None, &send_options)
			.await
			.map_err(TnlaError::WriteError)?;
		Ok(())
	}
}
