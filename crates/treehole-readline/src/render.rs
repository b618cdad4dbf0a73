//! Terminal rendering of posts.

use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use treehole_core::feed::Tab;
use treehole_core::post::{Mood, Post};

/// Formats a timestamp like `10月18日 21:05`, in local time.
pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%m月%d日 %H:%M")
        .to_string()
}

pub fn print_feed(tab: Tab, posts: &[Post]) {
    let title = match tab {
        Tab::Saved => "收藏",
        _ => "树洞",
    };
    println!("{}", format!("=== {title} ===").bright_magenta().bold());

    if posts.is_empty() {
        let hint = match tab {
            Tab::Saved => "还没有收藏的心事",
            _ => "这里还很安静",
        };
        println!("{}", hint.bright_black());
        return;
    }

    for (i, post) in posts.iter().enumerate() {
        print_post(Some(i + 1), post);
    }
}

/// Prints one post card; `index` is its number in the listed view, if any.
pub fn print_post(index: Option<usize>, post: &Post) {
    let marker = match index {
        Some(n) => format!("[{n}]"),
        None => "[new]".to_string(),
    };
    println!(
        "{} {} {}",
        marker.bright_white().bold(),
        post.mood.icon(),
        format_date(post.created_at).bright_black()
    );
    for line in post.content.lines() {
        println!("    {line}");
    }

    if let Some(echo) = &post.echo_reply {
        println!("    {} {}", "树洞的回声".bright_cyan(), format!("\"{echo}\"").cyan().italic());
    }

    let heart = if post.is_liked { "♥".red() } else { "♡".normal() };
    let saved = if post.is_saved {
        "已收藏".yellow()
    } else {
        "收藏".bright_black()
    };
    println!(
        "    {} {}   💬 {}   {}",
        heart,
        post.likes,
        post.comments.len(),
        saved
    );

    for comment in &post.comments {
        println!(
            "      {} {} {}",
            format!("{}:", comment.author_alias).bright_black(),
            comment.content,
            format_date(comment.created_at).bright_black()
        );
    }
    println!();
}

pub fn print_moods() {
    for mood in Mood::all() {
        println!("  {} {:<9} {}", mood.icon(), mood.tag(), mood.label());
    }
}

pub fn print_help() {
    let lines = [
        ("/home", "show every post"),
        ("/saved", "show saved posts"),
        ("/post <mood> <text>", "tell the tree hole something"),
        ("/like <n>", "like or unlike post n"),
        ("/save <n>", "save or unsave post n"),
        ("/comment <n> <text>", "reply under post n"),
        ("/moods", "list moods"),
        ("quit", "leave"),
    ];
    for (usage, what) in lines {
        println!("  {:<22} {}", usage.bright_cyan(), what.bright_black());
    }
}
