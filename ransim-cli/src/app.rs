use clap::{Arg, Command};

use crate::nf_type::GNBSIM_STR;

fn get_nf_subcommand(nf_name: String) -> Command {
	let nf_about = format!("Runs {nf_name} network function");
	Command::new(nf_name)
		.about(nf_about)
		.arg(
			Arg::new("config")
				.help("Configuration file to use")
				.required(true)
				.value_name("CONFIG_FILE")
				.long("config")
				.short('c'),
		)
		.arg(
			Arg::new("ip")
				.help("N2 peer address; comma-separated for a multi-homed peer")
				.value_name("ADDR[,ADDR...]")
				.long("ip"),
		)
		.arg(
			Arg::new("port")
				.help("N2 peer SCTP port")
				.value_name("PORT")
				.long("port"),
		)
		.arg(
			Arg::new("lport")
				.help("Local SCTP port to bind before connecting")
				.value_name("PORT")
				.long("lport"),
		)
}

pub fn get_clap_app(
	name: &'static str,
	about: &'static str,
	author: &'static str,
	version: &'static str,
) -> Command {
	Command::new(name)
		.version(version)
		.author(author)
		.about(about)
		.subcommand_required(true)
		.arg_required_else_help(true)
		.subcommand(get_nf_subcommand(GNBSIM_STR.to_string()))
}
