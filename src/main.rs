use std::env;
use std::process;

use mtu_dict::{
    export_file, extract_file, load_file, suggest_default, DictionaryKind, FormatSchema, Result,
};

const USAGE: &str = "\
Usage: mtu-dict <command>

Commands:
  extract <file> <kind> [-o <out.mtux>]   extract a legacy blob, print stats
  dump    <file> <kind>                   plain-text listing of all entries
  lookup  <artifact> <word>               exact + prefix query
  suggest <artifact> <word>               ranked spelling suggestions

Kinds: en-tr (MTU.TRK), tr-en, syn, hangman";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "extract" => cmd_extract(&args[2..]),
        "dump" => cmd_dump(&args[2..]),
        "lookup" => cmd_lookup(&args[2..]),
        "suggest" => cmd_suggest(&args[2..]),
        other => {
            eprintln!("Unknown command: {}\n\n{}", other, USAGE);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}

fn parse_kind(name: &str) -> DictionaryKind {
    match name {
        "en-tr" => DictionaryKind::EnglishTurkish,
        "tr-en" => DictionaryKind::TurkishEnglish,
        "syn" => DictionaryKind::Synonyms,
        "hangman" => DictionaryKind::Hangman,
        other => {
            eprintln!("Unknown dictionary kind: {} (en-tr, tr-en, syn, hangman)", other);
            process::exit(1);
        }
    }
}

fn require<'a>(args: &'a [String], n: usize, what: &str) -> &'a str {
    match args.get(n) {
        Some(arg) => arg,
        None => {
            eprintln!("Missing argument: {}\n\n{}", what, USAGE);
            process::exit(1);
        }
    }
}

fn cmd_extract(args: &[String]) -> Result<()> {
    let file = require(args, 0, "<file>");
    let kind = parse_kind(require(args, 1, "<kind>"));
    let schema = FormatSchema::for_kind(kind);

    let index = extract_file(file, &schema)?;
    println!("Extracted {} dictionary: {} entries", index.kind(), index.len());

    let sample = index.entries().iter().take(10);
    for (i, entry) in sample.enumerate() {
        println!("  {}. {} ({} senses)", i + 1, entry.headword, entry.senses.len());
    }
    if index.len() > 10 {
        println!("  ... and {} more", index.len() - 10);
    }

    if let Some(pos) = args.iter().position(|a| a == "-o") {
        let out = require(args, pos + 1, "-o <out.mtux>");
        export_file(&index, out)?;
        println!("Wrote artifact: {}", out);
    }
    Ok(())
}

fn cmd_dump(args: &[String]) -> Result<()> {
    let file = require(args, 0, "<file>");
    let kind = parse_kind(require(args, 1, "<kind>"));
    let index = extract_file(file, &FormatSchema::for_kind(kind))?;

    for entry in index.entries() {
        println!("{:30}{}", entry.headword, entry.senses.join(" # "));
    }
    Ok(())
}

fn cmd_lookup(args: &[String]) -> Result<()> {
    let artifact = require(args, 0, "<artifact>");
    let word = require(args, 1, "<word>");
    let index = load_file(artifact)?;

    match index.exact(word) {
        Some((id, entry)) => {
            println!("{} [{}]", entry.headword, id.0);
            for sense in &entry.senses {
                println!("  {}", sense);
            }
            for &r in &entry.cross_refs {
                if let Some(linked) = index.by_id(r) {
                    println!("  see also: {}", linked.headword);
                }
            }
        }
        None => {
            println!("Not found: {}", word);
            let matches: Vec<_> = index.prefix(word, 10).collect();
            if !matches.is_empty() {
                println!("Prefix matches:");
                for (_, entry) in matches {
                    println!("  {}", entry.headword);
                }
            }
        }
    }
    Ok(())
}

fn cmd_suggest(args: &[String]) -> Result<()> {
    let artifact = require(args, 0, "<artifact>");
    let word = require(args, 1, "<word>");
    let index = load_file(artifact)?;

    let suggestions = suggest_default(&index, word);
    if suggestions.is_empty() {
        println!("No suggestions for: {}", word);
    } else {
        for s in suggestions {
            println!("  {} (distance {})", s.candidate, s.distance);
        }
    }
    Ok(())
}
