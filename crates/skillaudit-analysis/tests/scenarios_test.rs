//! End-to-end analysis over parsed documents

use pretty_assertions::assert_eq;
use skillaudit_analysis::{estimate_corpus, CompatibilityAnalyzer, SimilarityScorer};
use skillaudit_corpus::parse_document;
use skillaudit_types::{Capability, Corpus, DuplicityBand, SkillDocument, Violation};
use std::path::Path;

const PR_CREATOR: &str = "---
name: git-pr-creator
description: Create pull requests with semantic titles and linked tickets
---

## What I do
Open a pull request from the current branch, fill the template and link the ticket.

## When to use me
After the feature branch is pushed and checks pass.

## Steps
1. Read the branch name
2. Draft the title and body
3. Create the pull request
";

const ESLINT: &str = "---
name: javascript-eslint-linter
description: Linting framework integration for JavaScript projects
---

## What I do
Configure eslint with flat config, typescript-eslint and prettier plugins for monorepos.

## When to use me
When a Node workspace needs consistent formatting across React packages.

## Steps
1. npm i -D eslint
2. npx eslint . --fix
";

const RUFF: &str = "---
name: python-ruff-linter
description: Linting framework integration for Python projects
---

## What I do
Check every module using ruff.

## When to use me
Before pushing Django code.

## Steps
1. uv add ruff
2. ruff format
";

const RUNNER: &str = "---
name: test-runner
description: Runs the suite
---

## Steps
```bash
cargo test --workspace
```
";

fn parse(id: &str, raw: &str) -> SkillDocument {
    let (document, _) = parse_document(id, Path::new(id), raw.to_string());
    document
}

fn corpus_of(documents: &[(&str, &str)]) -> Corpus {
    let mut corpus = Corpus::new("skills");
    for (id, raw) in documents {
        let (document, degradations) = parse_document(id, Path::new(id), (*raw).to_string());
        corpus.insert(document, degradations);
    }
    corpus
}

#[test]
fn test_single_renamed_identifier_is_merge_candidate() {
    let original = parse("git-pr-creator", PR_CREATOR);
    let renamed = parse(
        "git-mr-creator",
        &PR_CREATOR.replace("git-pr-creator", "git-mr-creator"),
    );

    let score = SimilarityScorer::new().score_pair(&original, &renamed);

    assert!(score.score >= 85, "score was {}", score.score);
    assert_eq!(score.band(), DuplicityBand::MergeCandidate);
}

#[test]
fn test_sibling_linters_for_different_languages() {
    let eslint = parse("javascript-eslint-linter", ESLINT);
    let ruff = parse("python-ruff-linter", RUFF);

    let score = SimilarityScorer::new().score_pair(&eslint, &ruff);

    assert!((45..=55).contains(&score.score), "score was {}", score.score);
    assert_eq!(score.score, SimilarityScorer::new().score_pair(&ruff, &eslint).score);
}

#[test]
fn test_shell_block_is_incompatible_without_process_execution() -> anyhow::Result<()> {
    let analyzer = CompatibilityAnalyzer::with_default_contexts()?;
    let (profile, entries) = analyzer.analyze(&parse("test-runner", RUNNER));

    assert!(profile.requires(Capability::ProcessExecution));
    for (context, entry) in analyzer.contexts().iter().zip(&entries) {
        if context.permits(Capability::ProcessExecution) {
            assert!(entry.compatible, "{}", context.id);
        } else {
            assert!(!entry.compatible, "{}", context.id);
            assert!(entry
                .violations
                .contains(&Violation::Capability(Capability::ProcessExecution)));
        }
    }
    Ok(())
}

#[test]
fn test_repeated_runs_are_identical() -> anyhow::Result<()> {
    let corpus = corpus_of(&[
        ("python-ruff-linter", RUFF),
        ("git-pr-creator", PR_CREATOR),
        ("javascript-eslint-linter", ESLINT),
        ("test-runner", RUNNER),
        ("bare", "no structure at all"),
    ]);

    let scorer = SimilarityScorer::new().with_workers(3);
    let first = scorer.compute(&corpus);
    let second = scorer.compute(&corpus);
    assert_eq!(first, second);

    for i in 0..first.len() {
        assert_eq!(first.score_at(i, i), 100);
        for j in 0..first.len() {
            assert_eq!(first.score_at(i, j), first.score_at(j, i));
        }
    }

    assert_eq!(estimate_corpus(&corpus), estimate_corpus(&corpus));

    let analyzer = CompatibilityAnalyzer::with_default_contexts()?;
    assert_eq!(
        analyzer.analyze_corpus(&corpus),
        analyzer.analyze_corpus(&corpus)
    );
    Ok(())
}
