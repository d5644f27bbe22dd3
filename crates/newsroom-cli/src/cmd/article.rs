use clap::Subcommand;
use newsroom_core::article::{Article, NewArticle};
use newsroom_core::queue::ArticleSummary;
use std::path::Path;

use crate::cmd::{open_engine, Who};
use crate::output::{or_dash, print_json, print_table, truncate};

#[derive(Subcommand)]
pub enum ArticleSubcommand {
    /// Create a draft authored by --actor
    Create {
        #[arg(long)]
        title: String,
        /// Article id (lowercase letters, digits, hyphens); generated if omitted
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        author_name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value = "")]
        content: String,
    },

    /// List every article
    List,

    /// Show one article with its history
    Show { id: String },

    /// Actions --actor may take on an article right now
    Actions { id: String },
}

pub fn run(root: &Path, who: &Who, subcmd: ArticleSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ArticleSubcommand::Create {
            title,
            id,
            author_name,
            category,
            tags,
            content,
        } => create(
            root,
            who,
            NewArticle {
                id,
                title,
                author_name,
                category,
                tags,
                content,
            },
            json,
        ),
        ArticleSubcommand::List => list(root, json),
        ArticleSubcommand::Show { id } => show(root, &id, json),
        ArticleSubcommand::Actions { id } => actions(root, who, &id, json),
    }
}

fn create(root: &Path, who: &Who, new: NewArticle, json: bool) -> anyhow::Result<()> {
    let actor = who.require()?;
    let (_, engine) = open_engine(root)?;
    let article = engine.create_draft(new, &actor)?;
    if json {
        print_json(&article)?;
    } else {
        println!("Created draft '{}': {}", article.id, article.title);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let (config, engine) = open_engine(root)?;
    let articles = engine.store().list()?;
    let wpm = config.workflow.words_per_minute;

    if json {
        let summaries: Vec<ArticleSummary> = articles
            .iter()
            .map(|a| ArticleSummary::from_article(a, wpm))
            .collect();
        return print_json(&summaries);
    }

    if articles.is_empty() {
        println!("No articles.");
        return Ok(());
    }
    let rows = articles
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                truncate(&a.title, 40),
                a.status.to_string(),
                a.author_display().to_string(),
                or_dash(a.category.as_deref()),
            ]
        })
        .collect();
    print_table(&["ID", "TITLE", "STATUS", "AUTHOR", "CATEGORY"], rows);
    Ok(())
}

fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let (config, engine) = open_engine(root)?;
    let article = engine.store().get(id)?;
    if json {
        return print_json(&article);
    }
    print_article(&article, config.workflow.words_per_minute);
    Ok(())
}

fn print_article(article: &Article, words_per_minute: usize) {
    println!("{} ({})", article.title, article.id);
    println!("  status:    {}", article.status);
    println!("  author:    {}", article.author_display());
    println!("  category:  {}", or_dash(article.category.as_deref()));
    if !article.tags.is_empty() {
        println!("  tags:      {}", article.tags.join(", "));
    }
    println!(
        "  length:    {} words, {} min read",
        article.word_count(),
        article.read_time_minutes(words_per_minute)
    );
    if let Some(reviewer) = &article.reviewer_id {
        println!("  reviewer:  {reviewer}");
    }
    if let Some(feedback) = &article.feedback {
        println!("  feedback:  {feedback}");
    }
    if !article.history.is_empty() {
        println!("  history:");
        for h in &article.history {
            println!(
                "    {}  {} -> {}  {} by {}",
                h.at.format("%Y-%m-%d %H:%M"),
                h.from,
                h.to,
                h.action,
                h.actor_id
            );
        }
    }
}

fn actions(root: &Path, who: &Who, id: &str, json: bool) -> anyhow::Result<()> {
    let actor = who.require()?;
    let (_, engine) = open_engine(root)?;
    let available = engine.available_actions(id, &actor)?;
    if json {
        return print_json(&serde_json::json!({ "id": id, "actions": available }));
    }
    if available.is_empty() {
        println!("No actions available to {} ({}).", actor.id, actor.role);
    } else {
        for action in available {
            println!("{action}");
        }
    }
    Ok(())
}
