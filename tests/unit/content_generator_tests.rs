/*!
 * Tests for model output cleanup in the content generator
 */

use clipfab::content_generator::ContentGenerator;

#[test]
fn test_clean_topic_should_strip_quotes_and_keep_first_line() {
    let raw = "\"How AI Is Changing Photography\"\nHere are some details.";
    assert_eq!(
        ContentGenerator::clean_topic(raw),
        Some("How AI Is Changing Photography".to_string())
    );
}

#[test]
fn test_clean_topic_with_fenced_reply_should_unwrap_it() {
    let raw = "```\nThe Secret Life of Deep Sea Creatures\n```";
    assert_eq!(
        ContentGenerator::clean_topic(raw),
        Some("The Secret Life of Deep Sea Creatures".to_string())
    );
}

#[test]
fn test_clean_topic_with_short_reply_should_reject_it() {
    assert_eq!(ContentGenerator::clean_topic("Topic:"), None);
    assert_eq!(ContentGenerator::clean_topic("   "), None);
}
