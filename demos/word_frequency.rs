//! Counts words read from stdin and prints them in alphabetical order,
//! then reports the most frequent word and how many words share the first letter.
//!
//! ```text
//! cargo run --example word_frequency < some_text.txt
//! ```

use std::io::{self, BufRead};

use rb_tree_map::{Reverse, TreeMap};

fn main() -> io::Result<()> {
    let mut counts: TreeMap<String, usize> = TreeMap::new();
    for line in io::stdin().lock().lines() {
        for word in line?.split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            *counts.entry(word.to_lowercase()).or_insert(0) += 1;
        }
    }

    for (word, count) in &counts {
        println!("{word:>20} {count}");
    }

    let mut by_count: TreeMap<(usize, String), (), Reverse> = TreeMap::default();
    for (word, count) in &counts {
        let _ignore = by_count.insert((*count, word.clone()), ());
    }
    if let Some(((count, word), _)) = by_count.first_key_value() {
        println!("most frequent: {word} ({count})");
    }

    let Some((first, _)) = counts.first_key_value() else {
        return Ok(());
    };
    let letter = first.chars().next().unwrap_or_default();
    let same_letter = counts
        .range(letter.to_string()..)
        .take_while(|(word, _)| word.starts_with(letter))
        .count();
    println!("{same_letter} distinct words start with {letter:?}");
    Ok(())
}
