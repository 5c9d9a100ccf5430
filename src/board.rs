use crate::aging::{compute_aging, Bucket, Issue};
use crate::models::{Board, IssueCard, IssueRecord, RejectedIssue};
use chrono::{DateTime, Utc};
use tracing::warn;

pub fn build_board(records: &[IssueRecord]) -> Board {
    build_board_at(Utc::now(), records)
}

/// Records that fail to parse land in `rejected`; the rest keep input order
/// within their bucket.
pub fn build_board_at(now: DateTime<Utc>, records: &[IssueRecord]) -> Board {
    let mut board = Board::default();

    for record in records {
        let issue = match Issue::from_record(record) {
            Ok(issue) => issue,
            Err(err) => {
                warn!(number = record.number, "skipping issue: {err}");
                board.rejected.push(RejectedIssue {
                    number: record.number,
                    error: err.to_string(),
                });
                continue;
            }
        };

        let report = compute_aging(&issue, now);
        let bucket = report.bucket;
        let card = IssueCard { issue, report };
        match bucket {
            Some(bucket) => board.bucket_mut(bucket).push(card),
            None => board.unbucketed.push(card),
        }
    }

    board
}

impl Board {
    pub fn bucket(&self, bucket: Bucket) -> &[IssueCard] {
        match bucket {
            Bucket::Newest => &self.newest,
            Bucket::Newer => &self.newer,
            Bucket::Older => &self.older,
            Bucket::Oldest => &self.oldest,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<IssueCard> {
        match bucket {
            Bucket::Newest => &mut self.newest,
            Bucket::Newer => &mut self.newer,
            Bucket::Older => &mut self.older,
            Bucket::Oldest => &mut self.oldest,
        }
    }
}
