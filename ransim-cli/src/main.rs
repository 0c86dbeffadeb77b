use clap::{crate_authors, crate_description, crate_name, crate_version};
use ransim_cli::{app::get_clap_app, nf_type::App};

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let command = get_clap_app(
		crate_name!(),
		crate_description!(),
		crate_authors!(),
		crate_version!(),
	);
	let matches = command.get_matches();
	let (nf_type, matches) = matches.subcommand().expect("Subcommand Not present");
	App::start_app(nf_type, matches)?;
	Ok(())
}
