//! Grouping of remote references by derived branch name.

use std::collections::HashMap;

use super::refs::RemoteRef;

/// All references that resolved to one local branch name, in enumeration
/// order. The first entry seeds the local branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchGroup {
    pub branch: String,
    pub refs: Vec<RemoteRef>,
}

/// Group references by derived branch name, preserving first-seen group
/// order and enumeration order within each group.
pub fn group_by_branch(refs: Vec<RemoteRef>) -> Vec<BranchGroup> {
    let (groups, _) = refs.into_iter().fold(
        (Vec::new(), HashMap::new()),
        |(mut groups, mut index): (Vec<BranchGroup>, HashMap<String, usize>), r| {
            match index.get(&r.branch) {
                Some(&at) => groups[at].refs.push(r),
                None => {
                    index.insert(r.branch.clone(), groups.len());
                    groups.push(BranchGroup {
                        branch: r.branch.clone(),
                        refs: vec![r],
                    });
                }
            }
            (groups, index)
        },
    );

    groups
}
