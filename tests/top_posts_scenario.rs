//! Top Posts Scenario Tests
//!
//! End-to-end ranking through store, ledger, index and service:
//! - Votes only show up after a refresh
//! - The older post keeps its place until overtaken in votes
//! - Unknown campaigns and repeated votes are rejected

use std::sync::Arc;

use campaignrank::campaign::{CampaignDraft, CampaignId, CompanyId};
use campaignrank::index::{IndexConfig, RankIndex};
use campaignrank::ledger::{InMemoryVoteLedger, LedgerError, VoterId};
use campaignrank::post::{Post, PostId};
use campaignrank::ranking::{CampaignRankingService, RankingError, VoteRecorder};
use campaignrank::store::{CampaignRepository, Company, MemoryStore};
use chrono::{DateTime, Duration, TimeZone, Utc};

// =============================================================================
// Helper Functions
// =============================================================================

const ONE: CampaignId = CampaignId(1);
const TWO: CampaignId = CampaignId(2);

const LEADER: PostId = PostId(1);
const LEADER2: PostId = PostId(2);
const LEADER3: PostId = PostId(3);

struct Harness {
    store: Arc<MemoryStore>,
    index: Arc<RankIndex>,
    service: CampaignRankingService<MemoryStore>,
    recorder: VoteRecorder<MemoryStore, InMemoryVoteLedger>,
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap()
}

fn campaign_draft(company_id: u64, title: &str) -> CampaignDraft {
    CampaignDraft::new()
        .title(title)
        .description("campaign")
        .company(CompanyId(company_id))
        .starttime(at(1))
        .endtime(at(1) + Duration::days(30))
}

/// Two companies with one campaign each; campaign one holds leader and
/// leader2, campaign two holds all three posts.
async fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    for (id, name) in [(1, "apple"), (2, "microsoft")] {
        store
            .insert_company(Company {
                id: CompanyId(id),
                name: name.to_string(),
            })
            .unwrap();
    }
    store.restore_campaign(ONE, campaign_draft(1, "one")).unwrap();
    store.restore_campaign(TWO, campaign_draft(2, "two")).unwrap();

    store
        .insert_post(Post::new(LEADER, "leader", at(2), vec![ONE, TWO]))
        .unwrap();
    store
        .insert_post(Post::new(LEADER2, "leader2", at(3), vec![ONE, TWO]))
        .unwrap();
    store
        .insert_post(Post::new(LEADER3, "leader3", at(4), vec![TWO]))
        .unwrap();

    let index = Arc::new(RankIndex::start(IndexConfig::default()).unwrap());
    let service = CampaignRankingService::new(Arc::clone(&store), Arc::clone(&index));
    service.reindex_campaign(ONE).unwrap();
    service.reindex_campaign(TWO).unwrap();
    index.refresh().await.unwrap();

    let recorder = VoteRecorder::new(
        Arc::clone(&store),
        Arc::new(InMemoryVoteLedger::new()),
        Arc::clone(&index),
    );

    Harness {
        store,
        index,
        service,
        recorder,
    }
}

fn ids(h: &Harness, campaign_id: CampaignId, min_votes: u64) -> Vec<PostId> {
    h.service
        .top_posts(campaign_id, min_votes)
        .unwrap()
        .iter()
        .map(|ranked| ranked.post.id)
        .collect()
}

// =============================================================================
// Fixture Shape Tests
// =============================================================================

/// Each company owns one campaign; campaign one has two posts.
#[tokio::test]
async fn test_fixture_shape() {
    let h = harness().await;

    assert_eq!(h.store.company_campaigns(CompanyId(1)).unwrap().len(), 1);
    assert_eq!(h.store.company_campaigns(CompanyId(2)).unwrap().len(), 1);
    assert_eq!(h.store.campaign_posts(ONE).unwrap().len(), 2);
}

// =============================================================================
// Ranking Scenario Tests
// =============================================================================

/// Vote, refresh and re-rank the way the leaderboard is used.
#[tokio::test]
async fn test_top_posts_scenario() {
    let h = harness().await;

    // Nobody has a vote yet
    assert!(ids(&h, TWO, 1).is_empty());
    assert_eq!(ids(&h, TWO, 0).len(), 3);

    h.recorder.cast_vote(VoterId(1), LEADER).unwrap();
    h.index.refresh().await.unwrap();

    assert_eq!(ids(&h, TWO, 0)[0], LEADER);
    assert_eq!(ids(&h, TWO, 1), vec![LEADER]);

    h.recorder.cast_vote(VoterId(1), LEADER2).unwrap();
    h.index.refresh().await.unwrap();

    // Equal votes: the older post keeps first place
    assert_eq!(&ids(&h, TWO, 0)[..2], &[LEADER, LEADER2]);

    h.recorder.cast_vote(VoterId(2), LEADER2).unwrap();
    h.index.refresh().await.unwrap();

    assert_eq!(&ids(&h, TWO, 0)[..2], &[LEADER2, LEADER]);
    assert_eq!(ids(&h, TWO, 2), vec![LEADER2]);
}

/// Ranked results carry the post and the count they were ranked by.
#[tokio::test]
async fn test_ranked_post_contents() {
    let h = harness().await;
    h.recorder.cast_vote(VoterId(1), LEADER3).unwrap();
    h.recorder.cast_vote(VoterId(2), LEADER3).unwrap();
    h.index.refresh().await.unwrap();

    let ranked = h.service.top_posts(TWO, 1).unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].rank, 1);
    assert_eq!(ranked[0].vote_count, 2);
    assert_eq!(ranked[0].post.title, "leader3");
    assert_eq!(ranked[0].post.vote_count, 2);
}

/// Votes become visible only after refresh.
#[tokio::test]
async fn test_vote_invisible_until_refresh() {
    let h = harness().await;

    h.recorder.cast_vote(VoterId(1), LEADER3).unwrap();
    assert!(ids(&h, TWO, 1).is_empty());

    h.index.refresh().await.unwrap();
    assert_eq!(ids(&h, TWO, 1), vec![LEADER3]);
}

/// A limit keeps the top of the ranking.
#[tokio::test]
async fn test_top_posts_limited() {
    let h = harness().await;
    h.recorder.cast_vote(VoterId(1), LEADER3).unwrap();
    h.index.refresh().await.unwrap();

    let ranked = h.service.top_posts_limited(TWO, 0, Some(2)).unwrap();
    let ranked_ids: Vec<_> = ranked.iter().map(|r| r.post.id).collect();
    assert_eq!(ranked_ids, vec![LEADER3, LEADER]);
}

// =============================================================================
// Rejection Tests
// =============================================================================

/// Querying a campaign that does not exist fails.
#[tokio::test]
async fn test_unknown_campaign() {
    let h = harness().await;

    let err = h.service.top_posts(CampaignId(42), 0).unwrap_err();
    assert!(matches!(err, RankingError::UnknownCampaign(CampaignId(42))));
    assert_eq!(h.index.metrics().snapshot().queries_rejected, 1);
}

/// A repeated vote is rejected and leaves the ranking untouched.
#[tokio::test]
async fn test_repeated_vote_not_reindexed() {
    let h = harness().await;
    h.recorder.cast_vote(VoterId(1), LEADER).unwrap();
    h.index.refresh().await.unwrap();
    let accepted = h.index.stats().unwrap().accepted_seq;

    let err = h.recorder.cast_vote(VoterId(1), LEADER).unwrap_err();
    assert!(matches!(
        err,
        RankingError::Ledger(LedgerError::AlreadyVoted { .. })
    ));

    assert_eq!(h.index.stats().unwrap().accepted_seq, accepted);
    assert_eq!(h.store.post(LEADER).unwrap().unwrap().vote_count, 1);
}

/// Voting for a post that does not exist fails before the ledger.
#[tokio::test]
async fn test_vote_for_unknown_post() {
    let h = harness().await;

    let err = h.recorder.cast_vote(VoterId(1), PostId(77)).unwrap_err();
    assert!(matches!(err, RankingError::PostNotFound(PostId(77))));
}
