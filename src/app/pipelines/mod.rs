pub mod invitation_pipeline;

pub use invitation_pipeline::InvitationPipeline;
