use std::net::IpAddr;
use std::{fs::File, io::Read};

use clap::ArgMatches;
use color_eyre::eyre::{Context, bail, eyre};
use gnbsim_app::GnbSimApp;
use gnbsim_app::config::GnbSimConfig;
use nf_base::{NfConfig, NfInstance, RuntimeType};
use parsing::JsonParser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const GNBSIM_STR: &str = "gnbsim";

pub struct App;

impl App {
	pub fn start_app(
		nf_type: &str,
		matches: &ArgMatches,
	) -> color_eyre::Result<()> {
		if nf_type != GNBSIM_STR {
			bail!("unknown network function {nf_type}");
		}
		let config_path = matches
			.get_one::<String>("config")
			.expect("config is a required argument");
		let mut file = File::open(config_path)
			.wrap_err_with(|| format!("opening config file {config_path}"))?;
		let mut contents = String::new();
		file.read_to_string(&mut contents)
			.wrap_err_with(|| format!("reading config file {config_path}"))?;
		let mut config: GnbSimConfig =
			JsonParser::from_json(&contents).wrap_err("parsing config file")?;
		apply_overrides(&mut config, matches)?;

		init_tracing(&config);
		let runtime = build_runtime(&config)?;
		runtime.block_on(async move {
			let shutdown = CancellationToken::new();
			let signal_token = shutdown.clone();
			tokio::spawn(async move {
				if tokio::signal::ctrl_c().await.is_ok() {
					info!("shutdown requested");
					signal_token.cancel();
				}
			});
			let app = GnbSimApp::initialize(config, shutdown)?;
			app.start().await?;
			Ok::<(), color_eyre::Report>(())
		})?;
		Ok(())
	}
}

fn apply_overrides(
	config: &mut GnbSimConfig,
	matches: &ArgMatches,
) -> color_eyre::Result<()> {
	if let Some(ips) = matches.get_one::<String>("ip") {
		let addrs: Result<Vec<IpAddr>, _> = ips.split(',').map(str::parse).collect();
		config.configuration.gnb.n2_addrs =
			addrs.map_err(|e| eyre!("invalid N2 peer address list {ips:?}: {e}"))?;
	}
	if let Some(port) = matches.get_one::<String>("port") {
		config.configuration.gnb.n2_port = port
			.parse()
			.map_err(|e| eyre!("invalid N2 port {port:?}: {e}"))?;
	}
	if let Some(lport) = matches.get_one::<String>("lport") {
		config.configuration.gnb.n2_local_port = Some(
			lport
				.parse()
				.map_err(|e| eyre!("invalid local SCTP port {lport:?}: {e}"))?,
		);
	}
	Ok(())
}

fn init_tracing(config: &GnbSimConfig) {
	let log_config = config.get_log_config();
	if !log_config.enable {
		return;
	}
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(&log_config.level));
	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_target(log_config.report_caller))
		.with(ErrorLayer::default())
		.init();
}

fn build_runtime(config: &GnbSimConfig) -> color_eyre::Result<tokio::runtime::Runtime> {
	let runtime = match config.get_runtime_config().rt_type {
		RuntimeType::Single => tokio::runtime::Builder::new_current_thread()
			.enable_all()
			.build()?,
		RuntimeType::Multi => tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.build()?,
	};
	Ok(runtime)
}
