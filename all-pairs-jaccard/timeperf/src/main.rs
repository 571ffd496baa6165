use std::time::Instant;

use all_pairs_jaccard::{SimpleJoiner, TokenSet};

const TRIALS: usize = 1;
const SCALES: [usize; 3] = [1_000, 2_000, 5_000];
const VOCAB_SIZES: [u32; 2] = [1_000, 100_000];
const SET_LEN: usize = 200;

fn main() {
    for &vocab_size in &VOCAB_SIZES {
        main_vocab(vocab_size);
    }
}

fn main_vocab(vocab_size: u32) {
    let max_sets = *SCALES.last().unwrap();

    let mut sets = Vec::with_capacity(max_sets);
    for _ in 0..max_sets {
        sets.push(TokenSet::from_ids(
            (0..SET_LEN).map(|_| rand::random::<u32>() % vocab_size),
        ));
    }

    for &parallel in &[false, true] {
        let mut joiner = SimpleJoiner::new().parallel(parallel);
        for &num_sets in &SCALES {
            while joiner.num_sets() < num_sets {
                joiner.add(sets[joiner.num_sets()].clone());
            }
            let mut num_results = 0;
            let elapsed_sec = measure(TRIALS, || {
                num_results += joiner.all_pairs().unwrap().len();
            });
            num_results /= TRIALS;
            println!(
                "[vocab_size={vocab_size},parallel={parallel},num_sets={num_sets},num_results={num_results}] {elapsed_sec} sec"
            );
        }
    }
}

fn measure<F>(num_trials: usize, mut func: F) -> f64
where
    F: FnMut(),
{
    // Measure
    let start = Instant::now();
    for _ in 0..num_trials {
        func();
    }
    let duration = start.elapsed();
    duration.as_secs_f64() / num_trials as f64
}
