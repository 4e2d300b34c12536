use regex::Regex;

/// Outcome of classifying a single review comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    /// The review raised (or failed to rule out) problems. Carries the
    /// patterns that fired, for logging.
    NeedsRevision { matched_patterns: Vec<String> },
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Approved => "approved",
            Verdict::NeedsRevision { .. } => "needs-revision",
        }
    }
}

/// Phrases that approve outright. Checked before anything else: a reviewer
/// who writes "no issues" is not second-guessed because of issue keywords
/// elsewhere in the same comment.
const APPROVAL_PHRASES: &[&str] = &["no issues", "lgtm", "looks good", "ready to merge", "ship it"];

/// Patterns that indicate the review raised a problem. Matched against the
/// lowercased comment; every hit is recorded in the verdict.
const ISSUE_PATTERNS: &[&str] = &[
    r"\bproblems?\b",
    r"\bbugs?\b",
    r"\bconcerns?\b",
    r"\berrors?\b",
    r"\bthere\s+(?:is|are)\b.*\b(?:issues?|problems?)\b",
    r"\bfound\b.*\b(?:issues?|problems?|bugs?)\b",
    r"\bhas\b.*\b(?:issues?|problems?|bugs?)\b",
    r"\bmust\s+fix\b",
    r"\bshould\s+fix\b",
    r"\bneeds?\b.*\bfix",
];

/// Words that flip a following "approve"/"approved" into a non-approval.
const NEGATION_TOKENS: &[&str] = &[
    "not", "isn't", "isnt", "never", "don't", "dont", "can't", "cant", "cannot", "wasn't",
    "wasnt", "won't", "wont",
];

/// Classify a review comment into a merge verdict.
///
/// Matching is case-insensitive. Explicit approval phrases are terminal:
/// a comment containing one is approved even when issue keywords appear
/// alongside it. Otherwise the comment needs both an approval token
/// ("approve"/"approved", not preceded by a negation) and zero issue-pattern
/// hits to count as approved. Anything ambiguous stays `NeedsRevision`,
/// which keeps the loop iterating rather than merging on a guess.
pub fn classify(text: &str) -> Verdict {
    let text = text.to_lowercase();

    for phrase in APPROVAL_PHRASES {
        if text.contains(phrase) {
            return Verdict::Approved;
        }
    }

    let matched_patterns = issue_matches(&text);

    if matched_patterns.is_empty() && has_approval_token(&text) {
        Verdict::Approved
    } else {
        Verdict::NeedsRevision { matched_patterns }
    }
}

fn issue_matches(text: &str) -> Vec<String> {
    ISSUE_PATTERNS
        .iter()
        .filter(|pattern| {
            Regex::new(pattern)
                .expect("Invalid issue pattern")
                .is_match(text)
        })
        .map(|pattern| pattern.to_string())
        .collect()
}

/// Whether the text contains a standalone "approve"/"approved" that is not
/// preceded by a negation ("not approved", "isn't approved").
fn has_approval_token(text: &str) -> bool {
    let approval = Regex::new(r"\bapproved?\b").expect("Invalid approval pattern");

    for found in approval.find_iter(text) {
        let negated = text[..found.start()]
            .split_whitespace()
            .next_back()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .map_or(false, |word| NEGATION_TOKENS.contains(&word));
        if !negated {
            return true;
        }
    }

    false
}
