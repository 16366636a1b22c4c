extern crate clap;
use clap::*;

mod cmd_tredraw;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let app = Command::new("tredraw")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`tredraw` - Draw phylogenetic trees with time series and clades")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_tredraw::pdf::make_subcommand())
        .subcommand(cmd_tredraw::to_json::make_subcommand())
        .subcommand(cmd_tredraw::diff::make_subcommand())
        .after_help(
            r###"Subcommands:

* pdf     - Draw a tree into a one page PDF
* to-json - Convert a Newick or JSON tree into the JSON tree format
* diff    - Compare two trees

Input trees are Newick or JSON, optionally xz compressed.
Set RUST_LOG=info to see the layout decisions.

"###,
        );

    // Check which subcomamnd the user ran...
    match app.get_matches().subcommand() {
        Some(("pdf", sub_matches)) => cmd_tredraw::pdf::execute(sub_matches),
        Some(("to-json", sub_matches)) => cmd_tredraw::to_json::execute(sub_matches),
        Some(("diff", sub_matches)) => cmd_tredraw::diff::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
