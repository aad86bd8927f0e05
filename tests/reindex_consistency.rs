//! Reindex Consistency Tests
//!
//! Tests that bulk reindexing and vote syncing never undo each other:
//! - A vote synced while a campaign is being reindexed keeps its count
//! - Index and store agree on every post once both have finished

use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use campaignrank::campaign::{Campaign, CampaignDraft, CampaignId};
use campaignrank::index::{IndexConfig, RankIndex};
use campaignrank::ledger::{InMemoryVoteLedger, VoterId};
use campaignrank::post::{Post, PostId};
use campaignrank::ranking::{CampaignRankingService, VoteRecorder};
use campaignrank::store::{CampaignRepository, MemoryStore, StoreResult};
use chrono::{TimeZone, Utc};

// =============================================================================
// Helper Functions
// =============================================================================

const CAMPAIGN: CampaignId = CampaignId(1);
const LEADER: PostId = PostId(1);
const LEADER2: PostId = PostId(2);

type Recorder = VoteRecorder<MemoryStore, InMemoryVoteLedger>;

/// Repository that casts one vote from another thread right after the
/// campaign's posts have been read, and gives it time to finish before
/// handing the posts back.
struct VoteAfterRead {
    inner: Arc<MemoryStore>,
    recorder: Mutex<Option<Arc<Recorder>>>,
    voter: Mutex<Option<JoinHandle<u64>>>,
}

impl VoteAfterRead {
    fn take_voter(&self) -> JoinHandle<u64> {
        self.voter.lock().unwrap().take().expect("vote was cast")
    }
}

impl CampaignRepository for VoteAfterRead {
    fn campaign(&self, id: CampaignId) -> StoreResult<Option<Campaign>> {
        self.inner.campaign(id)
    }

    fn campaign_posts(&self, id: CampaignId) -> StoreResult<Vec<Post>> {
        let posts = self.inner.campaign_posts(id)?;

        if let Some(recorder) = self.recorder.lock().unwrap().take() {
            let (done_tx, done_rx) = mpsc::channel();
            let handle = thread::spawn(move || {
                let count = recorder.cast_vote(VoterId(1), LEADER).unwrap();
                let _ = done_tx.send(());
                count
            });
            // Returns early when the vote has to wait for the import
            let _ = done_rx.recv_timeout(Duration::from_millis(200));
            *self.voter.lock().unwrap() = Some(handle);
        }

        Ok(posts)
    }

    fn post(&self, id: PostId) -> StoreResult<Option<Post>> {
        self.inner.post(id)
    }

    fn update_vote_count(&self, id: PostId, vote_count: u64) -> StoreResult<Post> {
        self.inner.update_vote_count(id, vote_count)
    }
}

fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let company = store.add_company("apple").unwrap();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    store
        .restore_campaign(
            CAMPAIGN,
            CampaignDraft::new()
                .title("one")
                .description("campaign")
                .company(company.id)
                .starttime(start)
                .endtime(start + chrono::Duration::days(30)),
        )
        .unwrap();
    store
        .insert_post(Post::new(LEADER, "leader", start + chrono::Duration::days(1), vec![CAMPAIGN]))
        .unwrap();
    store
        .insert_post(Post::new(LEADER2, "leader2", start + chrono::Duration::days(2), vec![CAMPAIGN]))
        .unwrap();
    store
}

// =============================================================================
// Interleaving Tests
// =============================================================================

/// A vote landing between the reindex read and its import is not lost.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_vote_during_reindex_keeps_count() {
    let store = seeded_store();
    let index = Arc::new(RankIndex::start(IndexConfig::default()).unwrap());
    let recorder = Arc::new(VoteRecorder::new(
        Arc::clone(&store),
        Arc::new(InMemoryVoteLedger::new()),
        Arc::clone(&index),
    ));
    let repository = Arc::new(VoteAfterRead {
        inner: Arc::clone(&store),
        recorder: Mutex::new(Some(recorder)),
        voter: Mutex::new(None),
    });
    let service = CampaignRankingService::new(Arc::clone(&repository), Arc::clone(&index));

    assert_eq!(service.reindex_campaign(CAMPAIGN).unwrap(), 2);
    assert_eq!(repository.take_voter().join().unwrap(), 1);
    index.refresh().await.unwrap();

    let ranked = service.top_posts(CAMPAIGN, 0).unwrap();
    assert_eq!(ranked[0].post.id, LEADER);
    assert_eq!(ranked[0].vote_count, 1);
    assert_eq!(store.post(LEADER).unwrap().unwrap().vote_count, 1);

    for entry in &ranked {
        assert_eq!(entry.vote_count, entry.post.vote_count);
    }
}

/// Reindexing after votes reproduces the counts the votes produced.
#[tokio::test]
async fn test_reindex_after_votes_matches_store() {
    let store = seeded_store();
    let index = Arc::new(RankIndex::start(IndexConfig::default()).unwrap());
    let recorder = VoteRecorder::new(
        Arc::clone(&store),
        Arc::new(InMemoryVoteLedger::new()),
        Arc::clone(&index),
    );
    let service = CampaignRankingService::new(Arc::clone(&store), Arc::clone(&index));

    recorder.cast_vote(VoterId(1), LEADER2).unwrap();
    recorder.cast_vote(VoterId(2), LEADER2).unwrap();
    service.reindex_campaign(CAMPAIGN).unwrap();
    index.refresh().await.unwrap();

    let counts: Vec<_> = service
        .top_posts(CAMPAIGN, 0)
        .unwrap()
        .iter()
        .map(|r| (r.post.id, r.vote_count))
        .collect();
    assert_eq!(counts, vec![(LEADER2, 2), (LEADER, 0)]);
}
