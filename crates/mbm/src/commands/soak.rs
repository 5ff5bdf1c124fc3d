//! Soak command - drive a session cache from many request threads.
//!
//! Each worker behaves like a request handler: it looks its session up and,
//! on a miss, "re-authenticates" by caching a fresh record. A share of the
//! sessions is abandoned after login so the sweeper has work to do.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::{debug, info};

use mbm_session::{CacheStats, SessionTokenCache};
use mbm_types::{Authority, ClientUser, SessionToken};

use super::Context;

/// Arguments for the soak command.
#[derive(Args, Debug)]
pub struct SoakArgs {
    /// Number of concurrent request workers
    #[arg(long, default_value_t = 8)]
    pub workers: usize,

    /// Number of returning users each worker cycles through
    #[arg(long, default_value_t = 100)]
    pub users: usize,

    /// How long to run, in seconds
    #[arg(long, default_value_t = 5)]
    pub seconds: u64,

    /// Override the configured TTL (milliseconds)
    #[arg(long)]
    pub ttl_ms: Option<u64>,

    /// Abandon one new session every N requests (0 disables)
    #[arg(long, default_value_t = 10)]
    pub abandon_every: u64,
}

#[derive(Debug, Default)]
struct Tally {
    requests: AtomicU64,
    logins: AtomicU64,
    abandoned: AtomicU64,
}

/// Run the soak command.
pub async fn run(args: SoakArgs, ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;
    let session_config = loaded.config.session();

    let cache: SessionTokenCache = SessionTokenCache::from_session_config(&session_config);
    if let Some(ttl_ms) = args.ttl_ms {
        cache.reset(Duration::from_millis(ttl_ms));
    }
    let sweeper = cache.spawn_sweeper();

    let config = cache.config();
    info!(
        workers = args.workers,
        users = args.users,
        seconds = args.seconds,
        ttl = ?config.ttl,
        sweep = sweeper.is_some(),
        "Starting soak run"
    );

    let tally = Arc::new(Tally::default());
    let deadline = Instant::now() + Duration::from_secs(args.seconds);

    let mut workers = Vec::with_capacity(args.workers);
    for worker in 0..args.workers {
        let cache = cache.clone();
        let tally = Arc::clone(&tally);
        let users = args.users.max(1);
        let abandon_every = args.abandon_every;
        workers.push(tokio::task::spawn_blocking(move || {
            run_worker(worker, &cache, &tally, users, abandon_every, deadline)
        }));
    }

    for handle in workers {
        handle.await.context("soak worker panicked")?;
    }

    if let Some(sweeper) = sweeper {
        sweeper.shutdown().await;
    }

    print_report(&tally, &cache.stats());
    Ok(())
}

fn run_worker(
    worker: usize,
    cache: &SessionTokenCache,
    tally: &Tally,
    users: usize,
    abandon_every: u64,
    deadline: Instant,
) {
    let mut sessions: Vec<Option<SessionToken>> = vec![None; users];
    let mut n: u64 = 0;

    while Instant::now() < deadline {
        let slot = (n as usize) % users;
        let token = sessions[slot];

        if cache.get_by_session_token(token.as_ref()).is_none() {
            let fresh = SessionToken::generate();
            let user = ClientUser::new(format!("worker{worker}-user{slot}"))
                .with_authorities([Authority::Customer])
                .with_session_token(fresh);
            if cache.put_user(user).is_ok() {
                sessions[slot] = Some(fresh);
                tally.logins.fetch_add(1, Ordering::Relaxed);
            }
        }

        if abandon_every > 0 && n % abandon_every == 0 {
            let token = SessionToken::generate();
            if cache.put(token, ClientUser::new("abandoned")).is_ok() {
                tally.abandoned.fetch_add(1, Ordering::Relaxed);
            }
        }

        tally.requests.fetch_add(1, Ordering::Relaxed);
        n += 1;
    }

    debug!(worker, requests = n, "Soak worker finished");
}

fn print_report(tally: &Tally, stats: &CacheStats) {
    let requests = tally.requests.load(Ordering::Relaxed);
    let lookups = stats.hits + stats.misses;
    let hit_rate = if lookups == 0 {
        0.0
    } else {
        stats.hits as f64 * 100.0 / lookups as f64
    };

    println!("requests:   {requests}");
    println!("logins:     {}", tally.logins.load(Ordering::Relaxed));
    println!("abandoned:  {}", tally.abandoned.load(Ordering::Relaxed));
    println!("hit rate:   {hit_rate:.1}%");
    println!("cached now: {}", stats.size);
    println!("expired:    {}", stats.expired);
    println!("swept:      {}", stats.swept);
    println!("evicted:    {}", stats.evicted);
}
