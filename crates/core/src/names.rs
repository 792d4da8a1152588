//! Random placeholder names offered as bylines on the submission form.

use rand::seq::IndexedRandom;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Beatrice", "Carlos", "Chloe", "Dmitri", "Edith", "Farah", "Gustav", "Hana",
    "Ingrid", "Jamal", "Keiko", "Leon", "Mabel", "Nadia", "Oscar", "Priya", "Quentin", "Rosa",
    "Soren", "Tamsin", "Ulrich", "Vera", "Wendell", "Ximena", "Yusuf", "Zelda",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Barros", "Castillo", "Dawson", "Eriksen", "Fitzgerald", "Garcia", "Holloway",
    "Iwata", "Jensen", "Kowalski", "Lindqvist", "Moreau", "Nakamura", "Okafor", "Petrov",
    "Quinn", "Ramirez", "Sato", "Thornton", "Underwood", "Valdez", "Whitaker", "Yilmaz",
];

/// A random `"First Last"` name.
pub fn random_full_name() -> String {
    random_full_name_with(&mut rand::rng())
}

/// A random `"First Last"` name drawn from the given generator.
pub fn random_full_name_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    // Both lists are non-empty constants.
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Anonymous");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Friend");
    format!("{first} {last}")
}
