use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mdspell::checker::dictionary::Dictionary;
use mdspell::checker::suggestions;
use mdspell::parser::{mask, FileType};
use mdspell::{get_misspellings, SpellChecker};

const SECTION: &str = r#"# Installation

Run the installer and follow the prompts. See [the guide](https://example.com/guide "Guide")
for details, or check the ![diagram](/img/flow.png) below.

```sh
cargo install --locked mdspell
```

    indented code stays out of the check

Use `mdspell --help` to list the flags. Tables work too:

<table>
  <tr>
    <td colspan="2">Wiide column</td>
  </tr>
</table>

"#;

const WORDS: &[&str] = &[
    "the", "and", "run", "installer", "follow", "prompts", "see", "guide", "for", "details",
    "check", "diagram", "below", "use", "to", "list", "flags", "tables", "work", "too", "wide",
    "column", "installation", "or",
];

fn document(sections: usize) -> String {
    SECTION.repeat(sections)
}

fn mask_markdown(c: &mut Criterion) {
    let doc = document(100);

    c.bench_function("mask_markdown", |b| {
        b.iter(|| mask(black_box(&doc), FileType::Markdown))
    });
}

fn mask_plain(c: &mut Criterion) {
    let doc = document(100);

    c.bench_function("mask_plain", |b| {
        b.iter(|| mask(black_box(&doc), FileType::PlainText))
    });
}

fn suggest(c: &mut Criterion) {
    let dictionary = Dictionary::from_words(WORDS.iter().copied()).unwrap();

    c.bench_function("suggest_colunm", |b| {
        b.iter(|| suggestions::generate(black_box("Colunm"), &dictionary, 5))
    });
}

fn get_misspellings_markdown(c: &mut Criterion) {
    let doc = document(20);
    let dictionary = Dictionary::from_words(WORDS.iter().copied()).unwrap();
    let checker = SpellChecker::with_dictionary(dictionary, 5);
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

    c.bench_function("get_misspellings_markdown", |b| {
        b.iter(|| runtime.block_on(get_misspellings(&checker, black_box(&doc), "bench.md")))
    });
}

criterion_group!(masking, mask_markdown, mask_plain);
criterion_group!(checking, suggest, get_misspellings_markdown);
criterion_main!(masking, checking);
