//! Data generators for benchmarks

use fake::faker::address::en::CityName;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::*;
use fake::Fake;
use quire::collection::Document;
use quire::doc;
use rand::Rng;

/// Paths indexed by the benchmark collection: a nested string, a nested
/// integer, a nested float, and three arrays of scalars.
pub const INDEXED_PATHS: [&[&str]; 6] = [
    &["nested", "nested", "str"],
    &["nested", "nested", "int"],
    &["nested", "nested", "float"],
    &["strs"],
    &["ints"],
    &["floats"],
];

/// Generates one document touching every indexed path.
pub fn sample_doc() -> Document {
    let mut rng = rand::thread_rng();
    let city: String = CityName().fake();
    let words: Vec<String> = (0..3).map(|_| Word().fake()).collect();
    let ints: Vec<i64> = (0..3).map(|_| rng.gen_range(0..10_000)).collect();
    let floats: Vec<f64> = (0..3).map(|_| rng.gen_range(0.0..10_000.0)).collect();

    doc! {
        nested: {
            nested: {
                str: (city),
                int: (rng.gen_range(0i64..10_000)),
                float: (rng.gen_range(0.0f64..10_000.0)),
            },
        },
        strs: (words),
        ints: (ints),
        floats: (floats),
    }
}

/// Generates `count` documents with the shape of [sample_doc].
pub fn generate_sample_docs(count: usize) -> Vec<Document> {
    (0..count).map(|_| sample_doc()).collect()
}

/// Generates flat person documents without nested fields.
pub fn generate_simple_docs(count: usize) -> Vec<Document> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let age: i64 = rng.gen_range(18..80);

            doc! {
                id: (i as i64),
                firstName: (first_name),
                lastName: (last_name),
                age: (age),
                active: (rng.gen_bool(0.8)),
            }
        })
        .collect()
}
