//! 话题解析 - 把话题分析的行模板文本转换为 `Topic` 列表

use crate::generator::types::Topic;

const TOPIC_PREFIX: &str = "Topic";
const RATIONALE_PREFIX: &str = "Why it matters:";
const ANGLE_PREFIX: &str = "Key angle:";

/// 去掉行首的markdown强调与标题标记
fn strip_markers(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| c == '*' || c == '#' || c.is_whitespace())
}

/// 字段值两侧可能残留 `**`
fn clean_value(value: &str) -> String {
    value.trim().trim_matches('*').trim().to_string()
}

/// 按出现顺序解析话题，不做去重
///
/// `Topic` 开头的行开启新话题，标题取第一个冒号之后的文本（没有冒号时取整行）；
/// 第一个话题之前的字段行被忽略。
pub fn parse_topics(text: &str) -> Vec<Topic> {
    let mut topics = Vec::new();
    let mut current: Option<Topic> = None;

    for raw_line in text.lines() {
        let line = strip_markers(raw_line);

        if line.starts_with(TOPIC_PREFIX) {
            if let Some(topic) = current.take() {
                topics.push(topic);
            }
            let title = match line.split_once(':') {
                Some((_, rest)) => clean_value(rest),
                None => clean_value(line),
            };
            current = Some(Topic {
                title,
                ..Default::default()
            });
        } else if let Some(rest) = line.strip_prefix(RATIONALE_PREFIX) {
            if let Some(topic) = current.as_mut() {
                topic.rationale = clean_value(rest);
            }
        } else if let Some(rest) = line.strip_prefix(ANGLE_PREFIX) {
            if let Some(topic) = current.as_mut() {
                topic.angle_hint = clean_value(rest);
            }
        }
    }

    if let Some(topic) = current {
        topics.push(topic);
    }
    topics
}
