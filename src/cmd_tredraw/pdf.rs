use clap::*;
use std::io::Write;
use tredraw::libs::image::{Black, ByContinent, ByResidue, Coloring, TreeImage};
use tredraw::libs::io::write_text;
use tredraw::libs::phylo::import::import_tree;
use tredraw::libs::phylo::json::tree_to_json;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("pdf")
        .about("Draws a tree into a one page PDF")
        .after_help(
            r###"
Draws the tree with its leaf labels, a time series of leaf dates right of
the tree and, optionally, arrows marking clades.

Input:
* Newick or JSON tree, optionally xz compressed, [stdin] for standard input
* A JSON tree may carry layout settings under the "_settings" key

Notes:
* Leaf labels and the horizontal step are fitted to the page
* --settings writes the computed layout, it can be pasted into a JSON tree
  at "_settings" or edited to pin values; negative numbers mean default
* --json writes the tree and the computed layout as a JSON tree

Examples:
1. Draw with continent colors and clades:
   tredraw pdf tests/newick/flu.json out.pdf --continents --clades

2. Color by the residue at position 142:
   tredraw pdf tests/newick/flu.json out.pdf --aa-at 142

3. Keep the computed layout:
   tredraw pdf tests/newick/abc.nwk out.pdf --settings settings.json
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
                .required(true)
                .num_args(1)
                .index(2)
                .help("Output PDF filename. [stdout] for screen"),
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
            Arg::new("clades")
                .long("clades")
                .action(ArgAction::SetTrue)
                .help("Show clades"),
        )
        .arg(
            Arg::new("continents")
                .long("continents")
                .action(ArgAction::SetTrue)
                .conflicts_with("aa-at")
                .help("Color code by continent"),
        )
        .arg(
            Arg::new("aa-at")
                .long("aa-at")
                .num_args(1)
                .help("Color code by the amino acid at this position"),
        )
        .arg(
            Arg::new("branch-ids")
                .long("branch-ids")
                .action(ArgAction::SetTrue)
                .help("Show branch ids"),
        )
        .arg(
            Arg::new("subtree-top-bottom")
                .long("subtree-top-bottom")
                .action(ArgAction::SetTrue)
                .help("Draw the subtree top/bottom lines given in the settings"),
        )
        .arg(
            Arg::new("number-strains-threshold")
                .long("number-strains-threshold")
                .num_args(1)
                .value_parser(value_parser!(usize))
                .help("Annotate only branches with more leaves than this"),
        )
        .arg(
            Arg::new("print")
                .long("print")
                .short('p')
                .action(ArgAction::SetTrue)
                .help("Print the tree to stdout, stderr when the PDF goes to stdout"),
        )
        .arg(
            Arg::new("edges")
                .long("edges")
                .action(ArgAction::SetTrue)
                .help("Print the edge length histogram, like --print"),
        )
        .arg(
            Arg::new("settings")
                .long("settings")
                .num_args(1)
                .help("Write the computed settings to this file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .num_args(1)
                .help("Write the tree with the computed settings to this file, .xz compresses"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile = args.get_one::<String>("infile").unwrap();
    let outfile = args.get_one::<String>("outfile").unwrap();

    let doc = import_tree(infile)?;
    let mut tree = doc.tree;
    let mut image = TreeImage::default();
    if let Some(settings) = &doc.settings {
        image.load_settings_json(settings)?;
    }

    if args.get_flag("fix-labels") {
        tree.fix_labels();
    }
    if args.get_flag("ladderize") {
        tree.ladderize();
    }

    if args.get_flag("print") || args.get_flag("edges") {
        // keep stdout for the PDF itself
        let mut writer: Box<dyn Write> = if outfile == "-" || outfile == "stdout" {
            Box::new(std::io::stderr().lock())
        } else {
            tredraw::writer("stdout")?
        };
        if args.get_flag("print") {
            tree.print(&mut writer)?;
        }
        if args.get_flag("edges") {
            tree.print_edges(&mut writer)?;
        }
        writer.flush()?;
    }

    if args.get_flag("clades") {
        image.clades.show = true;
    }
    if args.get_flag("branch-ids") {
        image.tree.show_branch_ids = true;
    }
    if args.get_flag("subtree-top-bottom") {
        image.time_series.show_subtree_top_bottom = true;
    }
    if let Some(threshold) = args.get_one::<usize>("number-strains-threshold") {
        image.tree.number_strains_threshold = *threshold;
    }

    let coloring: Box<dyn Coloring> = if args.get_flag("continents") {
        Box::new(ByContinent::new(&tree))
    } else if let Some(pos) = args.get_one::<String>("aa-at") {
        Box::new(ByResidue::new(&tree, pos))
    } else {
        Box::new(Black)
    };

    image.make_pdf(outfile, &tree, coloring.as_ref())?;

    let settings = image.dump_settings().to_json();
    if let Some(file) = args.get_one::<String>("settings") {
        let mut text = serde_json::to_string_pretty(&settings)?;
        text.push('\n');
        write_text(file, &text)?;
    }
    if let Some(file) = args.get_one::<String>("json") {
        write_text(file, &tree_to_json(&tree, "tredraw pdf", Some(settings)))?;
    }

    Ok(())
}
