//! The fixed reports selectable by flag.
//!
//! Each built-in is an ordinary list declaration, so it is resolved and
//! rendered exactly like a user-declared `--list`.

use super::columns::ListType;
use super::plan::ListSpec;

/// Built-in report, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinReport {
    CalledPath,
    TimePath,
    AvgTimePath,
    ReferredPath,
    CalledRequest,
    TimeRequest,
    AvgTimeRequest,
}

impl BuiltinReport {
    pub const ALL: [BuiltinReport; 7] = [
        BuiltinReport::CalledPath,
        BuiltinReport::TimePath,
        BuiltinReport::AvgTimePath,
        BuiltinReport::ReferredPath,
        BuiltinReport::CalledRequest,
        BuiltinReport::TimeRequest,
        BuiltinReport::AvgTimeRequest,
    ];

    pub fn list_type(self) -> ListType {
        match self {
            BuiltinReport::CalledPath
            | BuiltinReport::TimePath
            | BuiltinReport::AvgTimePath
            | BuiltinReport::ReferredPath => ListType::Path,
            BuiltinReport::CalledRequest
            | BuiltinReport::TimeRequest
            | BuiltinReport::AvgTimeRequest => ListType::Request,
        }
    }

    fn subject(self) -> &'static str {
        match self {
            BuiltinReport::CalledPath => "most frequently called paths",
            BuiltinReport::TimePath => "longest time paths",
            BuiltinReport::AvgTimePath => "longest average time paths",
            BuiltinReport::ReferredPath => "most widely referred paths",
            BuiltinReport::CalledRequest => "most frequently called requests",
            BuiltinReport::TimeRequest => "longest time requests",
            BuiltinReport::AvgTimeRequest => "longest average time requests",
        }
    }

    fn sort(self) -> &'static str {
        match self {
            BuiltinReport::CalledPath | BuiltinReport::CalledRequest => "count,time,path:asc",
            BuiltinReport::TimePath | BuiltinReport::TimeRequest => "time,count,path:asc",
            BuiltinReport::AvgTimePath | BuiltinReport::AvgTimeRequest => "avg-time,count,path:asc",
            BuiltinReport::ReferredPath => "requests,count,path:asc",
        }
    }

    /// `None` uses the default columns of the list type
    fn columns(self) -> Option<&'static str> {
        match self {
            BuiltinReport::AvgTimePath => {
                Some("index,count,avg-calls,time,avg-time,min-time,max-time,requests,path")
            }
            BuiltinReport::ReferredPath => {
                Some("index,requests,coverage,count,count-percent,time,time-percent,path")
            }
            _ => None,
        }
    }

    /// Declaration of this report for at most `rows` rows (`<= 0` for all)
    pub fn spec(self, rows: i64) -> ListSpec {
        let scope = if rows > 0 {
            format!("top {}", rows)
        } else {
            "all".to_string()
        };

        let mut spec = ListSpec::new(self.list_type())
            .with_name(format!("List of {} {}", scope, self.subject()))
            .with_sort(self.sort())
            .with_rows(rows);

        if let Some(columns) = self.columns() {
            spec = spec.with_columns(columns);
        }

        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::plan::ListPlan;

    #[test]
    fn test_every_builtin_resolves_cleanly() {
        for report in BuiltinReport::ALL {
            let plan = ListPlan::build(&report.spec(100), 100).unwrap();
            assert!(plan.dropped.is_empty(), "{:?} dropped {:?}", report, plan.dropped);
            assert_eq!(plan.list_type, report.list_type());
        }
    }

    #[test]
    fn test_titles() {
        assert_eq!(
            BuiltinReport::CalledPath.spec(20).name.as_deref(),
            Some("List of top 20 most frequently called paths")
        );
        assert_eq!(
            BuiltinReport::TimeRequest.spec(0).name.as_deref(),
            Some("List of all longest time requests")
        );
    }
}
