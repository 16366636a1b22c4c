use clap::*;
use std::io::Write;
use tredraw::libs::phylo::import::import_tree;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("diff")
        .about("Compares two trees")
        .after_help(
            r###"
Loads two trees, Newick or JSON, and reports where they differ in leaf
order, names, dates, edge lengths or topology.

Exits with an error when the trees differ.

Examples:
1. Newick against its JSON conversion:
   tredraw diff tests/newick/abc.nwk abc.json
"###,
        )
        .arg(
            Arg::new("infile1")
                .required(true)
                .num_args(1)
                .index(1)
                .help("First tree"),
        )
        .arg(
            Arg::new("infile2")
                .required(true)
                .num_args(1)
                .index(2)
                .help("Second tree"),
        )
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("outfile")
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile1 = args.get_one::<String>("infile1").unwrap();
    let infile2 = args.get_one::<String>("infile2").unwrap();

    let tree1 = import_tree(infile1)?.tree;
    let tree2 = import_tree(infile2)?.tree;

    let differences = tree1.differences(&tree2);
    let mut writer = tredraw::writer(args.get_one::<String>("outfile").unwrap())?;
    for line in &differences {
        writer.write_fmt(format_args!("{}\n", line))?;
    }
    writer.flush()?;

    if !differences.is_empty() {
        anyhow::bail!("{} and {} differ", infile1, infile2);
    }
    Ok(())
}
