// ── Protection path model ──
//
// Flattens protection switch state into the ordered list of operations
// an operator can pick from. Per group: AUTOMATIC, then FORCE for every
// path, then MANUAL for every path, path order preserved.

use serde::{Serialize, Serializer};

use crate::model::{ACTIVE_UNKNOWN, ConnectPoint, OpsOperation, ProtectionStates};

/// One selectable switching operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Path position within its group; `-1` for AUTOMATIC.
    pub index: i32,
    pub operation: OpsOperation,
    pub name: String,
    /// Identifier of the group the operation switches.
    #[serde(serialize_with = "as_text")]
    pub group: ConnectPoint,
}

fn as_text<S: Serializer>(group: &ConnectPoint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(group)
}

/// Name prefix of the `n`th group (1-based), empty when there is only one.
fn group_prefix(group_count: usize, n: usize) -> String {
    if group_count == 1 {
        String::new()
    } else {
        format!("GROUP{n} ")
    }
}

pub fn ops_operations(states: &ProtectionStates) -> Vec<Operation> {
    let group_count = states.len();
    let mut operations = Vec::new();

    for (n, (identifier, endpoint)) in states.iter().enumerate() {
        let prefix = group_prefix(group_count, n + 1);

        operations.push(Operation {
            index: ACTIVE_UNKNOWN,
            operation: OpsOperation::Automatic,
            name: format!("{prefix}{}", OpsOperation::Automatic),
            group: identifier.clone(),
        });

        for op in [OpsOperation::Force, OpsOperation::Manual] {
            for (index, path) in (0_i32..).zip(&endpoint.path_states) {
                operations.push(Operation {
                    index,
                    operation: op,
                    name: format!("{prefix}{op} {}", path.id.to_uppercase()),
                    group: identifier.clone(),
                });
            }
        }
    }

    operations
}
