use criterion::{criterion_group, BatchSize, Criterion};
use ec_schnorr::{schnorr::PrivateKey, PrivateKeyExt as _, Signer as _, Verifier as _};
use rand::{thread_rng, Rng};
use std::hint::black_box;

fn bench_signature_verification(c: &mut Criterion) {
    let mut msg = [0u8; 32];
    thread_rng().fill(&mut msg);
    c.bench_function(
        &format!("{}/msg_len={}", module_path!(), msg.len()),
        |b| {
            b.iter_batched(
                || {
                    let signer = PrivateKey::from_rng(&mut thread_rng());
                    let signature = signer.sign(&msg).unwrap();
                    (signer.public_key(), signature)
                },
                |(public_key, signature)| {
                    black_box(public_key.verify(&msg, &signature));
                },
                BatchSize::SmallInput,
            );
        },
    );
}

criterion_group!(benches, bench_signature_verification);
