//! Legacy tabular listing parsing.
//!
//! The original deployment protocol discovered selectors by grepping the
//! orchestrator CLI's wide service listing and splitting rows on
//! whitespace. The exec backend and the offline plan command still consume
//! that format, so the matching rules are preserved: a port matches only at
//! the start of a port token (or of a comma-separated segment inside one),
//! which is what keeps a search for `80:` from ever matching `8080:`.

use switchyard_core::{AppLabel, EntryPoint, ImageRef, Workload};

use crate::error::{ClusterError, ClusterResult};

/// True if the row exposes `port` through a `<port>:<node-port>/<proto>`
/// style token.
fn row_serves_port(row: &str, port: u16) -> bool {
    let prefix = format!("{port}:");
    row.split_whitespace()
        .flat_map(|token| token.split(','))
        .any(|segment| segment.starts_with(&prefix))
}

/// The `app=<label>` token of a row, if any.
fn row_app_label(row: &str) -> Option<AppLabel> {
    row.split_whitespace()
        .flat_map(|token| token.split(','))
        .find_map(|segment| segment.strip_prefix("app="))
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}

fn is_header(row: &str) -> bool {
    row.split_whitespace().next() == Some("NAME")
}

/// Extract the `app` label selected by the entry point exposing `port`
/// from a tabular service listing.
///
/// Exactly one row must match; zero or multiple matches are errors rather
/// than an empty selector.
pub fn port_label(listing: &str, port: u16) -> ClusterResult<AppLabel> {
    let matched: Vec<&str> = listing
        .lines()
        .filter(|row| !is_header(row) && row_serves_port(row, port))
        .collect();
    match matched.as_slice() {
        [] => Err(ClusterError::PortNotFound(port)),
        [row] => row_app_label(row).ok_or_else(|| {
            ClusterError::Parse(format!("row for port {port} has no app= selector: {row:?}"))
        }),
        many => Err(ClusterError::AmbiguousPort {
            port,
            count: many.len(),
        }),
    }
}

/// Parse a wide service listing into typed entry points.
///
/// Rows without an `app=` selector (headers aside) are not entry points of
/// the rollout and are skipped; a selector-bearing row with no parseable
/// port is malformed and fatal.
pub fn parse_entry_points(listing: &str, namespace: &str) -> ClusterResult<Vec<EntryPoint>> {
    let mut entry_points = Vec::new();
    for row in listing.lines() {
        if is_header(row) || row.trim().is_empty() {
            continue;
        }
        let Some(selector) = row_app_label(row) else {
            continue;
        };
        let name = row
            .split_whitespace()
            .next()
            .ok_or_else(|| ClusterError::Parse(format!("row has no name column: {row:?}")))?;
        let port = row_port(row)
            .ok_or_else(|| ClusterError::Parse(format!("row has no port column: {row:?}")))?;
        entry_points.push(EntryPoint {
            name: name.to_string(),
            namespace: namespace.to_string(),
            port,
            selector,
        });
    }
    Ok(entry_points)
}

/// First exposed port of a row: the leading number of the first
/// `80:31000/TCP` or `80/TCP` style token.
fn row_port(row: &str) -> Option<u16> {
    row.split_whitespace()
        .filter(|token| token.contains("/"))
        .flat_map(|token| token.split(','))
        .find_map(|segment| {
            let end = segment.find([':', '/'])?;
            segment[..end].parse::<u16>().ok()
        })
}

/// Parse a wide workload listing into typed workloads.
///
/// Wide workload rows end with `... <containers> <images> <selector>`, so
/// the last three columns are read from the end of the row.
pub fn parse_workloads(listing: &str, namespace: &str) -> ClusterResult<Vec<Workload>> {
    let mut workloads = Vec::new();
    for row in listing.lines() {
        if is_header(row) || row.trim().is_empty() {
            continue;
        }
        let tokens: Vec<&str> = row.split_whitespace().collect();
        let [name, .., containers, images, _selector] = tokens.as_slice() else {
            return Err(ClusterError::Parse(format!("short workload row: {row:?}")));
        };
        let Some(label) = row_app_label(row) else {
            return Err(ClusterError::Parse(format!(
                "workload row has no app= selector: {row:?}"
            )));
        };
        let container = containers.split(',').next().unwrap_or(containers);
        let image = images.split(',').next().unwrap_or(images);
        let (registry, tag) = image
            .rsplit_once(':')
            .ok_or_else(|| ClusterError::Parse(format!("untagged image {image:?}")))?;
        workloads.push(Workload {
            name: name.to_string(),
            namespace: namespace.to_string(),
            label,
            container: container.to_string(),
            image: ImageRef::new(registry, tag),
        });
    }
    Ok(workloads)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVC_LISTING: &str = "\
NAME              TYPE       CLUSTER-IP     EXTERNAL-IP   PORT(S)          AGE   SELECTOR
flask-svc         NodePort   172.20.1.10    <none>        80:31000/TCP     12d   app=green
flask-svc8080     NodePort   172.20.1.11    <none>        8080:31001/TCP   12d   app=blue
";

    #[test]
    fn port_80_does_not_match_8080() {
        assert_eq!(port_label(SVC_LISTING, 80).unwrap(), "green");
        assert_eq!(port_label(SVC_LISTING, 8080).unwrap(), "blue");
    }

    #[test]
    fn missing_port_fails_loudly() {
        assert!(matches!(
            port_label(SVC_LISTING, 443),
            Err(ClusterError::PortNotFound(443))
        ));
    }

    #[test]
    fn duplicate_port_fails_loudly() {
        let listing = "\
a   NodePort   172.20.1.10   <none>   8080:31000/TCP   1d   app=blue
b   NodePort   172.20.1.11   <none>   8080:31001/TCP   1d   app=green
";
        assert!(matches!(
            port_label(listing, 8080),
            Err(ClusterError::AmbiguousPort { port: 8080, count: 2 })
        ));
    }

    #[test]
    fn matching_row_without_selector_is_malformed() {
        let listing = "flask-svc   NodePort   172.20.1.10   <none>   80:31000/TCP   1d   <none>\n";
        assert!(matches!(
            port_label(listing, 80),
            Err(ClusterError::Parse(_))
        ));
    }

    #[test]
    fn multi_port_rows_match_on_inner_segments() {
        let listing =
            "flask-svc   NodePort   172.20.1.10   <none>   80:31000/TCP,8080:31001/TCP   1d   app=blue\n";
        assert_eq!(port_label(listing, 8080).unwrap(), "blue");
        assert_eq!(port_label(listing, 80).unwrap(), "blue");
    }

    #[test]
    fn parses_entry_points_and_skips_unlabelled_rows() {
        let listing = "\
NAME              TYPE        CLUSTER-IP    EXTERNAL-IP   PORT(S)          AGE   SELECTOR
kubernetes        ClusterIP   172.20.0.1    <none>        443/TCP          30d   <none>
flask-svc         NodePort    172.20.1.10   <none>        80:31000/TCP     12d   app=green
flask-svc8080     NodePort    172.20.1.11   <none>        8080:31001/TCP   12d   app=blue
";
        let eps = parse_entry_points(listing, "flask-alb").unwrap();
        assert_eq!(eps.len(), 2);
        assert_eq!(eps[0].name, "flask-svc");
        assert_eq!(eps[0].port, 80);
        assert_eq!(eps[0].selector, "green");
        assert_eq!(eps[1].port, 8080);
        assert_eq!(eps[1].namespace, "flask-alb");
    }

    #[test]
    fn parses_workloads_from_wide_listing() {
        let listing = "\
NAME    READY   UP-TO-DATE   AVAILABLE   AGE   CONTAINERS   IMAGES                              SELECTOR
blue    1/1     1            1           12d   flask        registry.example.com/flask:v1       app=blue
green   1/1     1            1           12d   flask        registry.example.com/flask:v1       app=green
";
        let workloads = parse_workloads(listing, "flask-alb").unwrap();
        assert_eq!(workloads.len(), 2);
        assert_eq!(workloads[0].name, "blue");
        assert_eq!(workloads[0].container, "flask");
        assert_eq!(workloads[0].image.registry, "registry.example.com/flask");
        assert_eq!(workloads[0].image.tag, "v1");
        assert_eq!(workloads[1].label, "green");
    }

    #[test]
    fn empty_listing_parses_to_nothing() {
        assert!(parse_entry_points("", "flask-alb").unwrap().is_empty());
        assert!(parse_workloads("", "flask-alb").unwrap().is_empty());
    }
}
