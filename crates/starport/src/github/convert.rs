//! Model conversion from GitHub API records to [`RepoItem`].

use super::types::{RawOwner, RawRepo, RepoItem, RepoOwner};

/// Convert a raw starred-repository record into a [`RepoItem`].
pub fn normalize(raw: &RawRepo) -> RepoItem {
    RepoItem {
        id: raw.id,
        full_name: raw.full_name.clone(),
        url: raw.html_url.clone(),
        description: raw.description.clone(),
        star_count: raw.stargazers_count,
        primary_language: raw.language.clone(),
        owner: normalize_owner(&raw.owner),
    }
}

fn normalize_owner(raw: &RawOwner) -> RepoOwner {
    RepoOwner {
        login: raw.login.clone(),
        avatar_url: raw.avatar_url.clone(),
        profile_url: raw.html_url.clone(),
    }
}

impl From<RawRepo> for RepoItem {
    fn from(raw: RawRepo) -> Self {
        normalize(&raw)
    }
}
