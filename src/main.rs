//! ygg CLI - command line interface for yggdrasil
//!
//! Builds Merkle trees from newline-delimited item files and exposes the
//! proof machinery for scripting: root computation, inclusion proofs and
//! their verification, consistency checks, and tree rendering/export.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use yggdrasil::{
    render, to_json, verify_leaf_inclusion, verify_tree_consistency, AuditProof, Digest, Hasher,
    MerkleTree,
};

#[derive(Parser)]
#[command(name = "ygg")]
#[command(about = "Merkle hash trees with audit and consistency proofs")]
#[command(version)]
struct Cli {
    /// Hash algorithm for leaf and node hashing
    #[arg(short, long, default_value = "sha256")]
    algo: Algo,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algo {
    Sha256,
    Blake3,
}

impl Algo {
    fn hasher(self) -> Hasher {
        match self {
            Algo::Sha256 => Hasher::sha256(),
            Algo::Blake3 => Hasher::blake3(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the root hash of the tree built from the items file
    Root {
        /// Newline-delimited items file ("-" for stdin)
        file: PathBuf,
    },

    /// Print the number of leaves
    Len {
        /// Newline-delimited items file ("-" for stdin)
        file: PathBuf,
    },

    /// Produce an inclusion proof for an item, as JSON
    Proof {
        /// Newline-delimited items file ("-" for stdin)
        file: PathBuf,
        /// The item to prove
        item: String,
        /// Treat the item as a hex-encoded leaf hash
        #[arg(long)]
        hashed: bool,
    },

    /// Verify an inclusion proof against a trusted root
    Verify {
        /// The item (or, with --hashed, its leaf hash in hex)
        item: String,
        /// Treat the item as a hex-encoded leaf hash
        #[arg(long)]
        hashed: bool,
        /// Path to the proof JSON
        #[arg(short, long)]
        proof: PathBuf,
        /// Trusted root hash in hex
        #[arg(short, long)]
        root: String,
    },

    /// Check that an older tree is a prefix of the items file's tree
    Consistency {
        /// Newline-delimited items file ("-" for stdin)
        file: PathBuf,
        /// The older tree's root hash in hex
        #[arg(long)]
        old_root: String,
        /// The older tree's leaf count
        #[arg(long)]
        old_size: usize,
    },

    /// Draw the tree as a box-drawing diagram
    Render {
        /// Newline-delimited items file ("-" for stdin)
        file: PathBuf,
    },

    /// Export the tree as a JSON node-name document
    Export {
        /// Newline-delimited items file ("-" for stdin)
        file: PathBuf,
        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let hasher = cli.algo.hasher();

    match cli.command {
        Commands::Root { file } => {
            let tree = build_tree(&file, hasher)?;
            let root = tree
                .root_hex()
                .ok_or_else(|| anyhow::anyhow!("the items file is empty"))?;
            println!("{root}");
        }

        Commands::Len { file } => {
            let tree = build_tree(&file, hasher)?;
            println!("{}", tree.len());
        }

        Commands::Proof { file, item, hashed } => {
            let tree = build_tree(&file, hasher)?;
            let proof = tree.get_proof(target_bytes(&item, hashed)?);
            println!("{}", serde_json::to_string_pretty(&proof)?);
        }

        Commands::Verify {
            item,
            hashed,
            proof,
            root,
        } => {
            let data = fs::read_to_string(&proof)
                .with_context(|| format!("reading proof {}", proof.display()))?;
            let proof: AuditProof = serde_json::from_str(&data).context("parsing proof JSON")?;
            let root = Digest::from_hex(&root).context("parsing root hash")?;
            if verify_leaf_inclusion(target_bytes(&item, hashed)?, &proof, &hasher, &root) {
                println!("verified");
            } else {
                println!("failed");
                std::process::exit(1);
            }
        }

        Commands::Consistency {
            file,
            old_root,
            old_size,
        } => {
            let tree = build_tree(&file, hasher)?;
            let old_root = Digest::from_hex(&old_root).context("parsing old root hash")?;
            if verify_tree_consistency(&tree, &old_root, old_size)? {
                println!("consistent");
            } else {
                println!("inconsistent");
                std::process::exit(1);
            }
        }

        Commands::Render { file } => {
            let tree = build_tree(&file, hasher)?;
            print!("{}", render(&tree));
        }

        Commands::Export { file, output } => {
            let tree = build_tree(&file, hasher)?;
            let json = to_json(&tree)?;
            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

/// Read newline-delimited items and build the tree
fn build_tree(path: &Path, hasher: Hasher) -> anyhow::Result<MerkleTree> {
    let data = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    let items: Vec<&str> = data.lines().filter(|line| !line.is_empty()).collect();
    Ok(MerkleTree::build(items, hasher))
}

/// The bytes to look up or verify: the raw item, or its decoded leaf hash
fn target_bytes(item: &str, hashed: bool) -> anyhow::Result<Vec<u8>> {
    if hashed {
        Ok(Digest::from_hex(item)
            .context("parsing leaf hash")?
            .as_bytes()
            .to_vec())
    } else {
        Ok(item.as_bytes().to_vec())
    }
}
