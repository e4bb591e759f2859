//! Per-domain agent profiles.
//!
//! Adding a domain means adding a [`Domain`] variant, a profile module here
//! and an arm in [`profile_for`].

pub mod finance;
pub mod jobs;
pub mod recipes;
pub mod research;
pub mod shopping;
pub mod travel;

use crate::agents::specialized::DomainProfile;
use crate::types::Domain;

/// The profile backing `domain`.
pub fn profile_for(domain: Domain) -> DomainProfile {
    match domain {
        Domain::Research => research::profile(),
        Domain::Finance => finance::profile(),
        Domain::Travel => travel::profile(),
        Domain::Shopping => shopping::profile(),
        Domain::Jobs => jobs::profile(),
        Domain::Recipes => recipes::profile(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_domain_has_matching_profile() {
        for domain in Domain::ALL {
            let profile = profile_for(domain);
            assert_eq!(profile.domain, domain);
            assert!(profile.banner.ends_with('\n'));
            assert!(profile.template.contains("{query}"));
            assert!(profile.template.contains("{memories}"));
            assert!(!profile.memory_prefix.is_empty());
        }
    }

    #[test]
    fn test_templates_with_tools_embed_context() {
        for domain in Domain::ALL {
            let profile = profile_for(domain);
            if !profile.tools.is_empty() {
                assert!(profile.template.contains("{context}"), "{} drops tool context", domain);
            }
        }
    }
}
