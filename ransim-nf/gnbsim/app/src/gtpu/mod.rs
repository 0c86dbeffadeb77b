//! N3 user plane: GTPv1-U framing with the PDU Session Container extension
//! and the UDP datapath moving IP packets between the tunnel device and the
//! UPF.

pub mod codec;
pub mod tunnel;

use thiserror::Error;

pub use codec::{GtpuMessage, decap, encap_tpdu, encode_echo_response};
pub use tunnel::{GtpuDatapath, GtpuTunnel, TunnelDevice};

pub const GTPU_PORT: u16 = 2152;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GtpuDecodeError {
	#[error("TruncatedHeader: {available} octets, {needed} needed")]
	TruncatedHeader { needed: usize, available: usize },

	#[error("UnsupportedVersion: GTP version {0}")]
	UnsupportedVersion(u8),

	#[error("TruncatedPayload: header announces {announced} octets, {available} present")]
	TruncatedPayload { announced: usize, available: usize },
}
