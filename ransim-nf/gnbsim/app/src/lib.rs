//! gNB + UE simulator against a real 5G core: N1/N2 control plane over one
//! SCTP association, N3 user plane over UDP/2152.

pub mod config;
pub mod context;
pub mod gtpu;
pub mod nas;
pub mod ngap;

use std::net::SocketAddr;
use std::sync::Arc;

use config::{GnbSimConfig, SerdeValidated};
use context::GnbContext;
use gnbsim_ngap::NetworkError;
use gtpu::{GtpuDatapath, GtpuTunnel, TunnelDevice};
use nf_base::NfInstance;
use ngap::{EngineError, EstablishedSession, NgapEngine};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum GnbSimError {
	#[error("ConfigError: Invalid Configuration")]
	ConfigError(#[from] serde_valid::validation::Errors),

	#[error("IdentityError: {0}")]
	IdentityError(#[from] nas::NasEngineError),

	#[error("NgapNetworkError: {0}")]
	NgapNetworkError(#[from] NetworkError),

	#[error("EngineError: {0}")]
	EngineError(#[from] EngineError),

	#[error("GtpuError: user plane I/O failed")]
	GtpuError(#[from] std::io::Error),
}

/// Hands out a tunnel device for an established session; `None` leaves the
/// session control-plane only.
pub type DeviceFactory =
	dyn Fn(&EstablishedSession) -> Option<Arc<dyn TunnelDevice>> + Send + Sync;

pub struct GnbSimApp {
	config: SerdeValidated<GnbSimConfig>,
	shutdown: CancellationToken,
	gnb: Arc<GnbContext>,
	device_factory: Option<Box<DeviceFactory>>,
}

impl GnbSimApp {
	/// Installs the factory producing tunnel devices for established PDU
	/// sessions; without one the N3 path only answers echo probes.
	pub fn with_device_factory(
		mut self,
		factory: Box<DeviceFactory>,
	) -> Self {
		self.device_factory = Some(factory);
		self
	}

	fn n2_peers(&self) -> Vec<SocketAddr> {
		let gnb = &self.config.inner().configuration.gnb;
		gnb.n2_addrs
			.iter()
			.map(|ip| SocketAddr::new(*ip, gnb.n2_port))
			.collect()
	}
}

impl NfInstance for GnbSimApp {
	type Config = GnbSimConfig;
	type Error = GnbSimError;

	fn initialize(
		config: Self::Config,
		shutdown: CancellationToken,
	) -> Result<Self, Self::Error> {
		let config = SerdeValidated::new(config)?;
		let gnb = GnbContext::from_config(&config.inner().configuration.gnb)?;
		Ok(Self {
			config,
			shutdown,
			gnb: Arc::new(gnb),
			device_factory: None,
		})
	}

	async fn start(&self) -> Result<(), Self::Error> {
		let configuration = &self.config.inner().configuration;
		let assoc = Arc::new(
			gnbsim_ngap::network::N2Association::connect(
				&self.n2_peers(),
				configuration.gnb.n2_local_port,
			)
			.await?,
		);

		let (engine, rx) = NgapEngine::new(self.gnb.clone());
		let sender = NgapEngine::spawn_sender(assoc.clone(), rx, self.shutdown.child_token());

		let sessions = engine.run(&assoc, configuration).await?;
		info!(count = sessions.len(), "all UEs registered with PDU sessions");

		let datapath = Arc::new(GtpuDatapath::bind(configuration.gnb.gtpu_addr).await?);
		for session in &sessions {
			let tunnel = GtpuTunnel {
				uplink_teid: session.uplink_teid,
				downlink_teid: session.downlink_teid,
				peer: SocketAddr::new(session.peer_gtpu_addr, gtpu::GTPU_PORT),
				qos_flow_id: session.qos_flow_id,
			};
			let device = self.device_factory.as_ref().and_then(|factory| factory(session));
			match device {
				Some(device) => {
					datapath
						.install_tunnel(tunnel, device, self.shutdown.child_token())
						.await;
				}
				None => warn!(
					supi = %session.supi,
					interface = %configuration.gnb.gtpu_interface,
					"no tunnel device installed; N3 stays passive for this session"
				),
			}
		}

		// The datapath serves decap and echo until shutdown; the sender task
		// drains in parallel.
		datapath.run_downlink(self.shutdown.child_token()).await?;
		sender.abort();
		Ok(())
	}
}
