//! gNB-side identity and the per-UE call contexts shared across the N2
//! tasks.

use std::net::IpAddr;

use counter::CounterU32;
use derive_new::new;
use gnbsim_nas::types::Plmn;
use gnbsim_ngap::{
	AmfUeNgapId,
	BroadcastPlmnItem,
	GlobalGnbId,
	GlobalRanNodeId,
	GnbId,
	NrCellIdentity,
	NrCgi,
	PagingDrx,
	PlmnIdentity,
	RanUeNgapId,
	SliceSupportItem,
	SnssaiIe,
	SupportedTaItem,
	Tac,
	TaiIe,
	UserLocationInformation,
	UserLocationInformationNr,
};
use rustc_hash::FxBuildHasher;
use scc::hash_map::HashMap as SccHashMap;

use crate::config::{GnbConfig, PagingDrxConfig};
use crate::nas::NasEngineError;

/// Call context the gNB keeps per UE: the NGAP id pair and the N3 tunnel
/// endpoints learned during PDU session setup.
#[derive(Debug, Clone, Default, new)]
pub struct UeCallContext {
	pub ran_ue_ngap_id: RanUeNgapId,
	#[new(default)]
	pub amf_ue_ngap_id: Option<AmfUeNgapId>,
	/// UPF-side tunnel endpoint for uplink traffic.
	#[new(default)]
	pub uplink_teid: Option<u32>,
	#[new(default)]
	pub peer_gtpu_addr: Option<IpAddr>,
	/// Locally allocated endpoint the UPF sends downlink traffic to.
	#[new(default)]
	pub downlink_teid: Option<u32>,
	#[new(default)]
	pub qos_flow_id: u8,
	#[new(default)]
	pub pdu_session_id: Option<u8>,
}

#[derive(Debug)]
pub struct GnbContext {
	pub plmn: Plmn,
	pub plmn_identity: PlmnIdentity,
	pub gnb_id: u32,
	pub tac: Tac,
	pub nr_cell_identity: NrCellIdentity,
	pub supported_ta_list: Vec<SupportedTaItem>,
	pub default_paging_drx: PagingDrx,
	pub gtpu_addr: IpAddr,
	ran_ue_id_allocator: CounterU32,
	teid_allocator: CounterU32,
	pub call_contexts: SccHashMap<RanUeNgapId, UeCallContext, FxBuildHasher>,
}

impl GnbContext {
	pub fn from_config(config: &GnbConfig) -> Result<Self, NasEngineError> {
		let plmn_identity = PlmnIdentity(config.plmn.pack()?);
		let mut supported_ta_list = Vec::with_capacity(config.supported_ta_list.len());
		for ta in &config.supported_ta_list {
			let mut broadcast_plmn_list = Vec::with_capacity(ta.broadcast_plmns.len());
			for broadcast in &ta.broadcast_plmns {
				let slices = broadcast
					.snssais
					.iter()
					.map(|snssai| SliceSupportItem {
						snssai: SnssaiIe {
							sst: snssai.sst,
							sd: snssai.sd.map(|sd| {
								let bytes = sd.to_be_bytes();
								[bytes[1], bytes[2], bytes[3]]
							}),
						},
					})
					.collect();
				broadcast_plmn_list.push(BroadcastPlmnItem {
					plmn_identity: PlmnIdentity(broadcast.plmn.pack()?),
					tai_slice_support_list: slices,
				});
			}
			supported_ta_list.push(SupportedTaItem {
				tac: Tac::from_u32(ta.tac),
				broadcast_plmn_list,
			});
		}
		let tac = supported_ta_list[0].tac;
		Ok(Self {
			plmn: config.plmn.clone(),
			plmn_identity,
			gnb_id: config.gnb_id,
			tac,
			nr_cell_identity: NrCellIdentity(
				(config.gnb_id as u64) << 14 | config.cell_local_id as u64,
			),
			supported_ta_list,
			default_paging_drx: match config.paging_drx {
				PagingDrxConfig::V32 => PagingDrx::V32,
				PagingDrxConfig::V64 => PagingDrx::V64,
				PagingDrxConfig::V128 => PagingDrx::V128,
				PagingDrxConfig::V256 => PagingDrx::V256,
			},
			gtpu_addr: config.gtpu_addr,
			ran_ue_id_allocator: CounterU32::new(),
			teid_allocator: CounterU32::with_start(config.teid_seed),
			call_contexts: SccHashMap::with_hasher(FxBuildHasher::default()),
		})
	}

	pub fn global_ran_node_id(&self) -> GlobalRanNodeId {
		GlobalRanNodeId::GlobalGnbId(GlobalGnbId {
			plmn_identity: self.plmn_identity,
			gnb_id: GnbId::new_22_bit(self.gnb_id),
		})
	}

	pub fn user_location(&self) -> UserLocationInformation {
		UserLocationInformation::Nr(UserLocationInformationNr {
			nr_cgi: NrCgi {
				plmn_identity: self.plmn_identity,
				nr_cell_identity: self.nr_cell_identity,
			},
			tai: TaiIe { plmn_identity: self.plmn_identity, tac: self.tac },
		})
	}

	/// RAN-UE-NGAP-IDs are handed out monotonically, 24-bit.
	pub fn allocate_ran_ue_id(&self) -> RanUeNgapId {
		RanUeNgapId(self.ran_ue_id_allocator.increment() & 0x00FF_FFFF)
	}

	/// Downlink TEIDs come from a monotonic 32-bit counter seeded from
	/// configuration.
	pub fn allocate_teid(&self) -> u32 {
		self.teid_allocator.increment()
	}
}

#[cfg(test)]
mod tests {
	use nonempty::NonEmpty;

	use super::*;
	use crate::config::{BroadcastPlmnConfig, SupportedTaConfig};
	use gnbsim_nas::types::Snssai;

	fn test_config() -> GnbConfig {
		GnbConfig {
			plmn: Plmn { mcc: "208".into(), mnc: "93".into() },
			gnb_id: 1,
			supported_ta_list: vec![SupportedTaConfig {
				tac: 1,
				broadcast_plmns: vec![BroadcastPlmnConfig {
					plmn: Plmn { mcc: "208".into(), mnc: "93".into() },
					snssais: NonEmpty::new(Snssai { sst: 1, sd: None }),
				}],
			}],
			paging_drx: PagingDrxConfig::V128,
			gtpu_addr: "192.168.1.2".parse().unwrap(),
			gtpu_interface: "gtp-gnb".into(),
			n2_addrs: vec!["192.168.1.1".parse().unwrap()],
			n2_port: 38412,
			n2_local_port: None,
			cell_local_id: 1,
			teid_seed: 0x100,
		}
	}

	#[test]
	fn allocators_are_monotonic_and_seeded() {
		let gnb = GnbContext::from_config(&test_config()).unwrap();
		assert_eq!(gnb.allocate_ran_ue_id(), RanUeNgapId(1));
		assert_eq!(gnb.allocate_ran_ue_id(), RanUeNgapId(2));
		assert_eq!(gnb.allocate_teid(), 0x100);
		assert_eq!(gnb.allocate_teid(), 0x101);
	}

	#[test]
	fn nr_cgi_embeds_the_gnb_id() {
		let gnb = GnbContext::from_config(&test_config()).unwrap();
		assert_eq!(gnb.nr_cell_identity.0, (1 << 14) | 1);
	}
}
