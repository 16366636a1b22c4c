use clap::*;
use std::io::Write;
use tredraw::libs::io::write_text;
use tredraw::libs::phylo::import::import_tree;
use tredraw::libs::phylo::json::tree_to_json;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("to-json")
        .about("Converts a tree into the JSON tree format")
        .after_help(
            r###"
Reads a Newick or JSON tree and writes it as a "phylogenetic-tree-v1"
JSON document.

Notes:
* Leaf names ending in -YYYY-MM-DD are split into a name and a date
* Settings of a JSON input are kept
* An output filename ending in .xz is compressed

Examples:
1. Newick to JSON:
   tredraw to-json tests/newick/abc.nwk

2. Ladderized and compressed:
   tredraw to-json tests/newick/abc.nwk --ladderize -o abc.json.xz
"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Input filename. [stdin] for standard input"),
        )
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("outfile")
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
        .arg(
            Arg::new("ladderize")
                .long("ladderize")
                .action(ArgAction::SetTrue)
                .help("Sort branches by their longest path, then latest date, then name"),
        )
        .arg(
            Arg::new("fix-labels")
                .long("fix-labels")
                .action(ArgAction::SetTrue)
                .help("Remove /HUMAN/, (H3N2)/ and (H1N1)/ from leaf names"),
        )
        .arg(
            Arg::new("print")
                .long("print")
                .short('p')
                .action(ArgAction::SetTrue)
                .help("Print the tree to stderr"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile = args.get_one::<String>("infile").unwrap();
    let outfile = args.get_one::<String>("outfile").unwrap();

    let doc = import_tree(infile)?;
    let mut tree = doc.tree;
    if args.get_flag("fix-labels") {
        tree.fix_labels();
    }
    if args.get_flag("ladderize") {
        tree.ladderize();
    }

    if args.get_flag("print") {
        let mut stderr = std::io::stderr().lock();
        tree.print(&mut stderr)?;
        stderr.flush()?;
    }

    write_text(outfile, &tree_to_json(&tree, "tredraw to-json", doc.settings))?;

    Ok(())
}
