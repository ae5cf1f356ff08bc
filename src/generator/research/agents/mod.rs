pub mod topic_analyst;
