//! Mock posts the feed is seeded with at start-up.

use chrono::{DateTime, Duration, Utc};

use crate::post::{Comment, Mood, Post};

/// Returns the seed posts, newest first, with timestamps relative to `now`.
pub fn seed_posts(now: DateTime<Utc>) -> Vec<Post> {
    let mut first = Post::new(
        "1",
        "有时候觉得长大真的很累，要伪装成情绪稳定的样子。其实我只想躲在被子里哭一场。",
        Mood::Sad,
        now - Duration::hours(1),
    )
    .with_echo_reply("没关系呀，眼泪是心灵的雨水。在被子里做回小孩，树洞会为你挡住外面的风。");
    first.likes = 42;
    first.comments.push(Comment {
        id: "c1".to_string(),
        content: "抱抱你，想哭就哭出来吧，这里没人认识你。".to_string(),
        created_at: now - Duration::minutes(30),
        author_alias: "陌生的兔子".to_string(),
    });

    let mut second = Post::new(
        "2",
        "今天在路边喂了一只流浪猫，它蹭了我的裤脚。突然觉得世界也没那么糟糕。",
        Mood::Grateful,
        now - Duration::hours(2),
    )
    .with_echo_reply("善意是双向的暖流。猫咪把它的信任交给你，你也把温柔留给了世界。");
    second.likes = 128;
    second.is_liked = true;
    second.is_saved = true;

    let mut third = Post::new(
        "3",
        "马上要考试了，虽然复习了很久，但还是很焦虑，怕对不起父母的期待。",
        Mood::Anxious,
        now - Duration::hours(24),
    );
    third.likes = 15;

    vec![first, second, third]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_reverse_chronological() {
        let posts = seed_posts(Utc::now());
        assert_eq!(posts.len(), 3);
        assert!(posts.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_seed_reactions_are_consistent() {
        let posts = seed_posts(Utc::now());
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        assert_eq!(posts[0].comments.len(), 1);
        assert!(posts[1].is_liked && posts[1].is_saved);
        assert!(posts[2].echo_reply.is_none());
    }
}
