//! Turns wire envelopes into the values endpoints hand back to callers.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{Branch, Collection, Commit, File, Layer, Page};
use crate::transport::Response;

/// `{ "data": ... }`
#[derive(Debug, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct CommitList {
    pub commits: Vec<Commit>,
}

#[derive(Debug, Deserialize)]
pub struct BranchList {
    pub branches: Vec<Branch>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionList {
    pub collections: Vec<Collection>,
}

#[derive(Debug, Deserialize)]
pub struct FileList {
    pub files: Vec<File>,
}

#[derive(Debug, Deserialize)]
pub struct PageList {
    pub pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
pub struct LayerList {
    pub layers: Vec<Layer>,
}

#[derive(Debug, Deserialize)]
pub struct ChangesetEnvelope<T> {
    pub changeset: T,
}

pub fn decode<T: DeserializeOwned>(response: &Response) -> Result<T> {
    response.parse().map_err(|err| {
        Error::UnexpectedResponse(format!(
            "{} (status {}, {} bytes)",
            err,
            response.status,
            response.body.len()
        ))
    })
}

/// The most recent commit of a newest-first listing.
pub fn first_commit(commits: Vec<Commit>, scope: &str) -> Result<Commit> {
    commits
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found("commit", scope))
}

pub fn find_file(files: Vec<File>, file_id: &str) -> Result<File> {
    files
        .into_iter()
        .find(|file| file.id.as_deref() == Some(file_id))
        .ok_or_else(|| Error::not_found("file", file_id))
}

pub fn find_page(pages: Vec<Page>, page_id: &str) -> Result<Page> {
    pages
        .into_iter()
        .find(|page| page.id.as_deref() == Some(page_id))
        .ok_or_else(|| Error::not_found("page", page_id))
}
