// Text analysis — sentiment, topic and entity providers behind swappable traits.
//
// The pipeline only ever talks to AnalysisProviders. Each capability can be
// replaced independently (tests use fixed-output mocks), and a failing
// provider degrades to a neutral value instead of aborting the page.

pub mod entities;
pub mod sentiment;
pub mod topic;
pub mod traits;
