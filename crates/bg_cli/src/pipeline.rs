use std::fs;
use std::path::PathBuf;

use bg_compose::{apply_template, extract_post, render_post, TemplateValues};
use bg_core::Result;
use bg_inference::providers::BoxedProvider;
use bg_publish::{BlogDir, SlackNotifier, TopicQueue};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Everything one run needs, resolved once at startup and passed down
/// explicitly. Absent credentials or webhook soft-disable the matching
/// feature; they never fail the run by themselves.
pub struct Config {
    pub blog_dir: PathBuf,
    pub topics_file: PathBuf,
    pub template_file: PathBuf,
    pub index_file: PathBuf,
    pub slack_webhook_url: Option<String>,
}

#[derive(Debug)]
pub enum RunOutcome {
    Published { file: PathBuf, title: String },
    QueueEmpty,
}

/// One scheduled run: dequeue, generate, extract, render, publish,
/// announce. The queue file is only rewritten after the article is
/// safely on disk, so a failed run never loses its topic.
pub async fn run_once(
    config: &Config,
    providers: &[BoxedProvider],
    today: NaiveDate,
) -> Result<RunOutcome> {
    let queue = TopicQueue::new(&config.topics_file);
    let Some((topic, remaining)) = queue.next_topic()? else {
        return Ok(RunOutcome::QueueEmpty);
    };
    info!(
        "📝 Writing about \"{}\" ({} topic(s) left in queue)",
        topic,
        remaining.len()
    );

    // fatal when every backend fails; nothing has been written yet
    let raw = bg_inference::generate_with_fallback(providers, &topic).await?;

    let post = extract_post(&raw, &topic);
    let rendered = render_post(&post, &topic);

    let template = fs::read_to_string(&config.template_file)?;
    let values = TemplateValues {
        title: rendered.title.clone(),
        description: rendered.description.clone(),
        content: rendered.content_html.clone(),
        tags: rendered.tags_html.clone(),
        date: today.format("%B %d, %Y").to_string(),
        read_time: format!("{} min read", rendered.read_time_minutes),
        category: rendered
            .tags
            .first()
            .cloned()
            .unwrap_or_else(|| "Engineering".to_string()),
        toc: rendered.toc_html.clone(),
    };
    let page = apply_template(&template, &values);

    let blog = BlogDir::new(&config.blog_dir, &config.index_file);
    let path = blog.save_post(&rendered.title, &page, today)?;

    // the topic counts as consumed only now that its article exists
    queue.persist_remaining(&remaining)?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    blog.append_to_index(&rendered, &filename, today)?;

    if let Some(webhook) = &config.slack_webhook_url {
        match SlackNotifier::new(webhook) {
            Ok(notifier) => notifier.notify(&rendered, &filename).await,
            Err(e) => warn!("⚠️ Slack notifier disabled: {}", e),
        }
    }

    Ok(RunOutcome::Published {
        file: path,
        title: rendered.title,
    })
}
