use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::gen_service_impl;
use service::assignment::UNASSIGNED_CLIENT;
use service::payroll::{PayrollLine, PayrollService, PeriodSelector};
use service::report::{ClientSummary, ComparisonRow, SiteSummary};
use service::ServiceError;

gen_service_impl! {
    struct ReportServiceImpl: service::report::ReportService = ReportServiceDeps {
        PayrollService: service::payroll::PayrollService = payroll_service
    }
}

/// Key of one billing bucket.  The client id is the identity; the unassigned
/// bucket has no id and sorts through its display name.
type BucketKey = (Option<Uuid>, Arc<str>);

fn bucket_key(line: &PayrollLine) -> BucketKey {
    (line.client_id, line.site_name.clone())
}

fn line_net(line: &PayrollLine) -> i64 {
    // Unavailable nets (zero-working-day defect lines) contribute nothing;
    // the line itself carries the flag.
    line.net_salary.unwrap_or(0)
}

/// Groups current-period lines per client and per site within the client.
/// Totals are exact sums over the rounded line values, nothing is re-derived.
pub fn summarize_clients(lines: &[PayrollLine]) -> Arc<[ClientSummary]> {
    let mut clients: BTreeMap<(Arc<str>, Option<Uuid>), BTreeMap<Arc<str>, (u32, i64)>> =
        BTreeMap::new();
    for line in lines {
        let client_key = (line.client_name.clone(), line.client_id);
        let site = clients.entry(client_key).or_default();
        let (guard_count, total_net) = site.entry(line.site_name.clone()).or_insert((0, 0));
        *guard_count += 1;
        *total_net += line_net(line);
    }

    clients
        .into_iter()
        .map(|((client_name, client_id), sites)| {
            let sites: Arc<[SiteSummary]> = sites
                .into_iter()
                .map(|(site_name, (guard_count, total_net))| SiteSummary {
                    site_name,
                    guard_count,
                    total_net,
                })
                .collect();
            ClientSummary {
                client_id,
                client_name,
                guard_count: sites.iter().map(|site| site.guard_count).sum(),
                total_net: sites.iter().map(|site| site.total_net).sum(),
                sites,
            }
        })
        .collect()
}

/// Period-over-period billing delta over the union of `(client, site)` keys.
/// A site staffed in only one of the two periods reports zero for the other;
/// keys staffed in neither never appear.
pub fn compare_periods(
    current: &[PayrollLine],
    previous: &[PayrollLine],
) -> Arc<[ComparisonRow]> {
    #[derive(Default)]
    struct Bucket {
        client_name: Option<Arc<str>>,
        guards: u32,
        current_amount: i64,
        previous_amount: i64,
    }

    let mut buckets: BTreeMap<BucketKey, Bucket> = BTreeMap::new();
    for line in current {
        let bucket = buckets.entry(bucket_key(line)).or_default();
        bucket.client_name.get_or_insert_with(|| line.client_name.clone());
        bucket.guards += 1;
        bucket.current_amount += line_net(line);
    }
    for line in previous {
        let bucket = buckets.entry(bucket_key(line)).or_default();
        bucket.client_name.get_or_insert_with(|| line.client_name.clone());
        bucket.guards += 1;
        bucket.previous_amount += line_net(line);
    }

    buckets
        .into_iter()
        .filter(|(_, bucket)| bucket.guards > 0)
        .map(|((client_id, site_name), bucket)| ComparisonRow {
            client_id,
            client_name: bucket
                .client_name
                .unwrap_or_else(|| UNASSIGNED_CLIENT.into()),
            site_name,
            current_amount: bucket.current_amount,
            previous_amount: bucket.previous_amount,
            difference: bucket.current_amount - bucket.previous_amount,
        })
        .collect()
}

#[async_trait]
impl<Deps: ReportServiceDeps> service::report::ReportService for ReportServiceImpl<Deps> {
    async fn client_summaries(&self) -> Result<Arc<[ClientSummary]>, ServiceError> {
        let lines = self.payroll_service.lines(PeriodSelector::Current).await?;
        Ok(summarize_clients(&lines))
    }

    async fn period_comparison(&self) -> Result<Arc<[ComparisonRow]>, ServiceError> {
        let current = self.payroll_service.lines(PeriodSelector::Current).await?;
        let previous = self.payroll_service.lines(PeriodSelector::Previous).await?;
        Ok(compare_periods(&current, &previous))
    }
}
