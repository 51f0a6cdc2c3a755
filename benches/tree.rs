use criterion::{criterion_group, criterion_main, Criterion};
use rand::{distributions::Alphanumeric, Rng, SeedableRng};
use yggdrasil::{verify_leaf_inclusion, Hasher, MerkleTree};

fn random_items(n: usize) -> Vec<String> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
    (0..n)
        .map(|_| (&mut rng).sample_iter(&Alphanumeric).take(32).map(char::from).collect())
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let items = random_items(1024);
    c.bench_function("build-1024", |b| {
        b.iter(|| MerkleTree::build(&items, Hasher::sha256()))
    });
}

fn bench_append(c: &mut Criterion) {
    let items = random_items(1024);
    c.bench_function("append-1024", |b| {
        b.iter(|| {
            let mut tree = MerkleTree::new(Hasher::sha256());
            for item in &items {
                tree.append(item);
            }
            tree
        })
    });
}

fn bench_proof(c: &mut Criterion) {
    let items = random_items(1024);
    let tree = MerkleTree::build(&items, Hasher::sha256());
    c.bench_function("proof-1024", |b| {
        b.iter(|| {
            for item in items.iter().step_by(64) {
                tree.get_proof(item);
            }
        })
    });
}

fn bench_verify(c: &mut Criterion) {
    let items = random_items(1024);
    let tree = MerkleTree::build(&items, Hasher::sha256());
    let root = tree.root_hash().unwrap();
    let proofs: Vec<_> = items.iter().map(|item| tree.get_proof(item)).collect();
    c.bench_function("verify-1024", |b| {
        b.iter(|| {
            for (item, proof) in items.iter().zip(&proofs).step_by(64) {
                assert!(verify_leaf_inclusion(item, proof, tree.hasher(), &root));
            }
        })
    });
}

criterion_group!(benches, bench_build, bench_append, bench_proof, bench_verify);
criterion_main!(benches);
