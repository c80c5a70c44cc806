use improvement_core::{to_markdown, JiraToMarkdown};

#[test]
fn transform_passes_through_absent_and_empty_values() {
    assert_eq!(JiraToMarkdown.transform(None), None);
    assert_eq!(JiraToMarkdown.transform(Some("")).as_deref(), Some(""));
}

#[test]
fn transform_converts_heading() {
    assert_eq!(
        JiraToMarkdown.transform(Some("h1. Title")).as_deref(),
        Some("# Title")
    );
}

#[test]
fn transform_is_deterministic() {
    let input = "h2. Plan\n* *wake* early\n* read {{docs}}";
    let first = JiraToMarkdown.transform(Some(input)).map(|text| text.into_owned());
    let second = JiraToMarkdown.transform(Some(input)).map(|text| text.into_owned());
    assert_eq!(first, second);
}

#[test]
fn converts_mixed_document() {
    let jira = "h2. Morning routine\n\
                * *Stretch* for _five_ minutes\n\
                ** see [guide|https://example.com/stretch]\n\
                # drink water\n\
                bq. small steps\n\
                {code:bash}\necho *not bold*\n{code}";

    let expected = "## Morning routine\n\
                    * **Stretch** for *five* minutes\n\
                    \x20 * see [guide](https://example.com/stretch)\n\
                    1. drink water\n\
                    > small steps\n\
                    ```bash\necho *not bold*\n```";

    assert_eq!(to_markdown(jira), expected);
}

#[test]
fn plain_text_is_unchanged() {
    let text = "Nothing special here, just words.";
    assert_eq!(to_markdown(text), text);
}
