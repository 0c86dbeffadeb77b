use std::net::IpAddr;

use gnbsim_nas::types::{Plmn, Snssai};
use nf_base::{LoggingConfig, NfConfig, RuntimeConfig};
use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use serde_with::serde_as;

#[derive(Serialize, Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GnbSimConfig {
	pub info: Info,
	#[validate]
	pub configuration: Configuration,
	pub logger: LoggingConfig,
	pub runtime: RuntimeConfig,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Info {
	pub version: String,
	pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
	#[validate]
	pub gnb: GnbConfig,
	#[validate]
	pub ue: UeTemplateConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GnbConfig {
	pub plmn: Plmn,
	/// 22-bit gNB identifier.
	#[validate(maximum = 4194303)]
	pub gnb_id: u32,
	#[validate(min_items = 1)]
	pub supported_ta_list: Vec<SupportedTaConfig>,
	#[serde(default)]
	pub paging_drx: PagingDrxConfig,
	pub gtpu_addr: IpAddr,
	/// Name of the user-plane tunnel interface; its management is left to
	/// the host.
	pub gtpu_interface: String,
	#[validate(min_items = 1)]
	pub n2_addrs: Vec<IpAddr>,
	#[serde(default = "default_n2_port")]
	pub n2_port: u16,
	#[serde(default)]
	pub n2_local_port: Option<u16>,
	/// NR cell local id appended below the gNB id in the 36-bit NR-CGI.
	#[serde(default = "default_cell_local_id")]
	#[validate(maximum = 16383)]
	pub cell_local_id: u16,
	#[serde(default = "default_teid_seed")]
	pub teid_seed: u32,
}

fn default_n2_port() -> u16 {
	38412
}

fn default_cell_local_id() -> u16 {
	1
}

fn default_teid_seed() -> u32 {
	1
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupportedTaConfig {
	#[validate(maximum = 16777215)]
	pub tac: u32,
	#[validate(min_items = 1)]
	pub broadcast_plmns: Vec<BroadcastPlmnConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastPlmnConfig {
	pub plmn: Plmn,
	pub snssais: NonEmpty<Snssai>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub enum PagingDrxConfig {
	#[serde(rename = "v32")]
	V32,
	#[serde(rename = "v64")]
	V64,
	#[default]
	#[serde(rename = "v128")]
	V128,
	#[serde(rename = "v256")]
	V256,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UeTemplateConfig {
	pub plmn: Plmn,
	#[validate(pattern = r"^[0-9]{10}$")]
	pub msin: String,
	#[validate(pattern = r"^[0-9]{16}$")]
	pub imeisv: String,
	#[serde_as(as = "serde_with::hex::Hex")]
	pub k: [u8; 16],
	#[serde_as(as = "serde_with::hex::Hex")]
	pub opc: [u8; 16],
	#[serde_as(as = "serde_with::hex::Hex")]
	pub amf: [u8; 2],
	#[validate(pattern = r"^[0-9]{1,4}$")]
	#[serde(default = "default_routing_indicator")]
	pub routing_indicator: String,
	/// Only the null protection scheme is implemented.
	#[validate(maximum = 0)]
	#[serde(default)]
	pub protection_scheme: u8,
	#[validate(minimum = 1)]
	#[serde(default = "default_ue_count")]
	pub count: u32,
	#[serde(default = "default_dnn")]
	pub dnn: String,
	pub snssai: Snssai,
	#[serde(default = "default_pdu_session_id")]
	pub pdu_session_id: u8,
	/// Replay the initial NAS message in Security Mode Complete even when
	/// the core did not ask for it, the behaviour real cores tolerate.
	#[serde(default = "default_true")]
	pub force_initial_nas_replay: bool,
}

fn default_routing_indicator() -> String {
	"0".to_owned()
}

fn default_ue_count() -> u32 {
	1
}

fn default_dnn() -> String {
	"internet".to_owned()
}

fn default_pdu_session_id() -> u8 {
	1
}

fn default_true() -> bool {
	true
}

impl NfConfig for GnbSimConfig {
	fn get_log_config(&self) -> &LoggingConfig {
		&self.logger
	}
	fn get_runtime_config(&self) -> &RuntimeConfig {
		&self.runtime
	}
}

pub struct SerdeValidated<T>(T);

impl<T: Validate> SerdeValidated<T> {
	pub fn new(value: T) -> Result<Self, serde_valid::validation::Errors> {
		value.validate()?;
		Ok(SerdeValidated(value))
	}

	pub fn inner(&self) -> &T {
		&self.0
	}

	pub fn into_inner(self) -> T {
		self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"{
		"info": { "version": "0.1.0", "description": "gnb simulator" },
		"configuration": {
			"gnb": {
				"plmn": { "mcc": "208", "mnc": "93" },
				"gnbId": 1,
				"supportedTaList": [
					{
						"tac": 1,
						"broadcastPlmns": [
							{ "plmn": { "mcc": "208", "mnc": "93" }, "snssais": [{ "sst": 1 }] }
						]
					}
				],
				"pagingDrx": "v128",
				"gtpuAddr": "192.168.1.2",
				"gtpuInterface": "gtp-gnb",
				"n2Addrs": ["192.168.1.1"]
			},
			"ue": {
				"plmn": { "mcc": "208", "mnc": "93" },
				"msin": "0000000003",
				"imeisv": "4370816125816151",
				"k": "465b5ce8b199b49faa5f0a2ee238a6bc",
				"opc": "cd63cb71954a9f4e48a5994e37a02baf",
				"amf": "8000",
				"snssai": { "sst": 1 },
				"count": 2
			}
		},
		"logger": { "enable": true, "level": "info", "reportCaller": false },
		"runtime": { "type": "single" }
	}"#;

	#[test]
	fn sample_config_parses_and_validates() {
		let config: GnbSimConfig = parsing::JsonParser::from_json(SAMPLE).unwrap();
		let config = SerdeValidated::new(config).unwrap();
		let inner = config.inner();
		assert_eq!(inner.configuration.gnb.n2_port, 38412);
		assert_eq!(inner.configuration.ue.count, 2);
		assert!(inner.configuration.ue.force_initial_nas_replay);
		assert_eq!(inner.configuration.ue.routing_indicator, "0");
	}

	#[test]
	fn ue_template_rejects_short_msin() {
		let broken = SAMPLE.replace("0000000003", "03");
		let config: GnbSimConfig = parsing::JsonParser::from_json(&broken).unwrap();
		assert!(SerdeValidated::new(config).is_err());
	}
}
