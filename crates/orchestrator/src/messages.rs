use github::CommitSha;

/// Comment templates posted by the loop.
pub struct LoopMessages;

impl LoopMessages {
    /// Ask the reviewer to review the current head of the change request.
    pub fn review_request(reviewer: &str, head: Option<&CommitSha>) -> String {
        match head {
            Some(sha) => format!(
                "@{reviewer} please review the latest changes (head commit {}). \
                 Reply here with your verdict.",
                sha.short()
            ),
            None => format!(
                "@{reviewer} please review the latest changes. Reply here with your verdict."
            ),
        }
    }

    /// Ask the implementer to address review feedback and push a new commit.
    pub fn revision_request(implementer: &str, feedback: &str) -> String {
        format!(
            r#"@{implementer} the reviewer requested changes. Please address the feedback below and push a new commit.

{quoted}"#,
            quoted = quote(feedback)
        )
    }
}

fn quote(text: &str) -> String {
    if text.is_empty() {
        return "> (no details given)".to_string();
    }
    text.lines()
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_request_mentions_reviewer_and_head() {
        let head = CommitSha::new("0123456789abcdef");
        let message = LoopMessages::review_request("review-agent", Some(&head));

        assert!(message.starts_with("@review-agent"));
        assert!(message.contains("0123456"));
        assert!(!message.contains("0123456789abcdef"));
    }

    #[test]
    fn test_review_request_without_commits() {
        let message = LoopMessages::review_request("review-agent", None);
        assert!(message.starts_with("@review-agent"));
        assert!(message.contains("review"));
    }

    #[test]
    fn test_revision_request_quotes_feedback() {
        let message = LoopMessages::revision_request(
            "implementation-agent",
            "There is a problem on line 10.\nAlso a typo in the docs.",
        );

        assert!(message.starts_with("@implementation-agent"));
        assert!(message.contains("> There is a problem on line 10."));
        assert!(message.contains("> Also a typo in the docs."));
    }

    #[test]
    fn test_revision_request_with_empty_feedback() {
        let message = LoopMessages::revision_request("implementation-agent", "");
        assert!(message.contains("> (no details given)"));
    }
}
