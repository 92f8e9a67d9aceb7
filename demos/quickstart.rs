//! Quick-start examples for the Dolby.io REST client.
//!
//! Run with:
//!   DOLBYIO_APP_KEY=... DOLBYIO_APP_SECRET=... cargo run --example quickstart
//!
//! Set `RUST_LOG=dolbyio_rest=debug` to see every request and page.

use dolbyio_rest::{
    ClientBuilder, ConferenceFilter, MediaJob, MediaJobKind, MediaJobRequest, PageLimits, PollOptions,
    TokenProvider,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> dolbyio_rest::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // -----------------------------------------------------------------------
    // 1. Exchange app credentials for an access token
    // -----------------------------------------------------------------------
    let app_key = std::env::var("DOLBYIO_APP_KEY").unwrap_or_default();
    let app_secret = std::env::var("DOLBYIO_APP_SECRET").unwrap_or_default();
    let token = TokenProvider::new(app_key, app_secret)?
        .fetch(Some(3600))
        .await?;
    println!("Token valid for {:?}s", token.expires_in);

    let client = ClientBuilder::new()
        .credential(token)
        .page_limits(PageLimits::max_pages(1000))
        .build()?;

    // -----------------------------------------------------------------------
    // 2. Every conference of the last 24 hours, all pages
    // -----------------------------------------------------------------------
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let filter = ConferenceFilter {
        from: Some(now_ms.saturating_sub(24 * 60 * 60 * 1000)),
        max: Some(100),
        ..Default::default()
    };
    let conferences = client.list_all_conferences(&filter).await?;
    println!("{} conferences", conferences.len());
    for conf in &conferences {
        println!("  {} | {} | live={}", conf.conf_id, conf.conf_alias, conf.live);
    }

    // -----------------------------------------------------------------------
    // 3. Participants of the first one, merged across pages by user id
    // -----------------------------------------------------------------------
    if let Some(conf) = conferences.first() {
        let participants = client
            .list_all_participants(&conf.conf_id, &Default::default())
            .await?;
        for (user_id, stats) in &participants {
            println!("  {user_id}: {}", stats.name.as_deref().unwrap_or("?"));
        }
    }

    // -----------------------------------------------------------------------
    // 4. Manual paging, one page at a time
    // -----------------------------------------------------------------------
    let mut filter = ConferenceFilter {
        max: Some(10),
        ..Default::default()
    };
    loop {
        let page = client.list_conferences(&filter).await?;
        println!("page with {} conferences", page.items.len());
        if !page.has_more() {
            break;
        }
        filter.start = page.next;
    }

    // -----------------------------------------------------------------------
    // 5. Upload a file, enhance it and wait for the result
    // -----------------------------------------------------------------------
    client.upload_file("dlb://in/demo.wav", "demo.wav").await?;
    let job_id = client
        .start_enhance(&MediaJobRequest::new("dlb://in/demo.wav", "dlb://out/demo.wav"))
        .await?;

    let opts = PollOptions {
        poll_interval: Duration::from_secs(3),
        timeout: Duration::from_secs(600),
        on_progress: Some(Box::new(|job: &MediaJob| {
            println!("  Status: {:?} ({}%)", job.status, job.progress);
        })),
    };
    let job = client
        .wait_for_job(MediaJobKind::Enhance, &job_id, &opts)
        .await?;
    println!("Enhance job {job_id} finished: {:?}", job.status);

    Ok(())
}
