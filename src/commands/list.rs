//! List posts from the content source

use anyhow::Result;

use crate::content::{PostSummaryProjector, ReadingTimeEstimator};
use crate::feed::PaginatedFeed;
use crate::helpers::Helpers;
use crate::Spacetraveling;

/// Print every post of the feed, newest first
pub async fn run(app: &Spacetraveling) -> Result<()> {
    let source = app.source()?;
    let query = app.config.feed_query();
    let projector = PostSummaryProjector::new(app.config.excerpt_length)
        .with_reading_time(ReadingTimeEstimator::new(app.config.words_per_minute));

    let mut feed = PaginatedFeed::start(source, projector, &query).await?;
    let posts = feed.load_all().await?;

    let helpers = Helpers::new(app.config.clone());
    println!("Posts ({}):", posts.len());
    for post in posts {
        println!(
            "  {} - {} by {} ({}) [{}]",
            helpers.date(post.publication_date.as_ref()),
            post.title,
            post.author,
            helpers.reading_time(post.reading_time.unwrap_or(1)),
            post.uid
        );
    }

    Ok(())
}
