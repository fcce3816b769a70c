//! Query factories for the entity families of the server schema.
//!
//! Each factory declares the family's filter variables, wires the entity
//! connection, and expands the caller's dotted field paths beneath it.
//! Callers set variable values afterwards and hand the query to a connector
//! via [`GraphqlQuery::run`].

use crate::error::QueryError;
use crate::fields::{fields_to_tree, FieldEntry, FieldTree};
use crate::query::GraphqlQuery;
use crate::selection::SelectionNode;

fn add_tree_fields(parent: &mut SelectionNode, tree: &FieldTree) {
    for (name, entry) in tree.iter() {
        let child = parent.add_field(name);
        if let FieldEntry::Nested(subtree) = entry {
            add_tree_fields(child, subtree);
        }
    }
}

fn collect_fields<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|field| field.as_ref().to_string())
        .collect()
}

/// Query for a single project by name.
pub fn project_query<I, S>(fields: I) -> Result<GraphqlQuery, QueryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut query = GraphqlQuery::new("ProjectQuery");
    let project_name_var = query.add_variable("projectName", "String!")?;

    let project = query.add_field("project");
    project.set_filter("name", project_name_var);

    let tree = fields_to_tree(collect_fields(fields));
    add_tree_fields(project, &tree);
    Ok(query)
}

/// Query for all projects.
pub fn projects_query<I, S>(fields: I) -> Result<GraphqlQuery, QueryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut query = GraphqlQuery::new("ProjectsQuery");
    let projects = query.add_connection("projects");

    let tree = fields_to_tree(collect_fields(fields));
    add_tree_fields(projects, &tree);
    Ok(query)
}

/// Query for folders of a project, filterable by ids, parents, names, and
/// whether they carry subsets.
///
/// A requested `tasks` field expands into a nested tasks connection with
/// `name` and `taskType`.
pub fn folders_query<I, S>(fields: I) -> Result<GraphqlQuery, QueryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut query = GraphqlQuery::new("FoldersQuery");
    let project_name_var = query.add_variable("projectName", "String!")?;
    let folder_ids_var = query.add_variable("folderIds", "[String!]")?;
    let parent_folder_ids_var = query.add_variable("parentFolderIds", "[String!]")?;
    let folder_names_var = query.add_variable("folderNames", "[String!]")?;
    let has_subsets_var = query.add_variable("folderHasSubsets", "Boolean!")?;

    let project = query.add_field("project");
    project.set_filter("name", project_name_var);

    let folders = project.add_connection("folders");
    folders.set_filter("ids", folder_ids_var);
    folders.set_filter("parentIds", parent_folder_ids_var);
    folders.set_filter("names", folder_names_var);
    folders.set_filter("hasSubsets", has_subsets_var);

    let mut fields = collect_fields(fields);
    let wants_tasks = fields.iter().any(|field| field == "tasks");
    fields.retain(|field| field != "tasks");
    if wants_tasks {
        let tasks = folders.add_connection("tasks");
        tasks.add_field("name");
        tasks.add_field("taskType");
    }

    let tree = fields_to_tree(fields);
    add_tree_fields(folders, &tree);
    Ok(query)
}

/// Query for subsets of a project, filterable by ids, names, and folders.
pub fn subsets_query<I, S>(fields: I) -> Result<GraphqlQuery, QueryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut query = GraphqlQuery::new("SubsetsQuery");
    let project_name_var = query.add_variable("projectName", "String!")?;
    let folder_ids_var = query.add_variable("folderIds", "[String!]")?;
    let subset_ids_var = query.add_variable("subsetIds", "[String!]")?;
    let subset_names_var = query.add_variable("subsetNames", "[String!]")?;

    let project = query.add_field("project");
    project.set_filter("name", project_name_var);

    let subsets = project.add_connection("subsets");
    subsets.set_filter("ids", subset_ids_var);
    subsets.set_filter("names", subset_names_var);
    subsets.set_filter("folderIds", folder_ids_var);

    let tree = fields_to_tree(collect_fields(fields));
    add_tree_fields(subsets, &tree);
    Ok(query)
}

/// Query for versions of a project, filterable by ids, subsets, version
/// numbers, and hero/latest flags.
pub fn versions_query<I, S>(fields: I) -> Result<GraphqlQuery, QueryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut query = GraphqlQuery::new("VersionsQuery");
    let project_name_var = query.add_variable("projectName", "String!")?;
    let subset_ids_var = query.add_variable("subsetIds", "[String!]")?;
    let version_ids_var = query.add_variable("versionIds", "[String!]")?;
    let versions_var = query.add_variable("versions", "[Int]")?;
    let hero_only_var = query.add_variable("heroOnly", "Boolean")?;
    let latest_only_var = query.add_variable("latestOnly", "Boolean")?;
    let hero_or_latest_only_var = query.add_variable("heroOrLatestOnly", "Boolean")?;

    let project = query.add_field("project");
    project.set_filter("name", project_name_var);

    let versions = project.add_connection("versions");
    versions.set_filter("ids", version_ids_var);
    versions.set_filter("subsetIds", subset_ids_var);
    versions.set_filter("versions", versions_var);
    versions.set_filter("heroOnly", hero_only_var);
    versions.set_filter("latestOnly", latest_only_var);
    versions.set_filter("heroOrLatestOnly", hero_or_latest_only_var);

    let tree = fields_to_tree(collect_fields(fields));
    add_tree_fields(versions, &tree);
    Ok(query)
}

/// Query for representations of a project, filterable by ids, names, and
/// versions.
pub fn representations_query<I, S>(fields: I) -> Result<GraphqlQuery, QueryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut query = GraphqlQuery::new("RepresentationsQuery");
    let project_name_var = query.add_variable("projectName", "String!")?;
    let repre_ids_var = query.add_variable("representationIds", "[String!]")?;
    let repre_names_var = query.add_variable("representationNames", "[String!]")?;
    let version_ids_var = query.add_variable("versionIds", "[String!]")?;

    let project = query.add_field("project");
    project.set_filter("name", project_name_var);

    let representations = project.add_connection("representations");
    representations.set_filter("ids", repre_ids_var);
    representations.set_filter("versionIds", version_ids_var);
    representations.set_filter("representationNames", repre_names_var);

    let tree = fields_to_tree(collect_fields(fields));
    add_tree_fields(representations, &tree);
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folders_query_declares_family_variables() {
        let mut query = folders_query(["name"]).expect("build");
        assert!(query.variable("projectName").is_ok());
        assert!(query.variable("folderIds").is_ok());
        assert!(query.variable("parentFolderIds").is_ok());
        assert!(query.variable("folderNames").is_ok());
        assert!(query.variable("folderHasSubsets").is_ok());

        query.set_variable_value("projectName", "proj1").expect("set");
        let text = query.render().expect("render");
        let expected = "\
query FoldersQuery($projectName: String!) {
  project(name: $projectName) {
    folders(first: 300) {
      edges {
        node {
          name
        }
      }
      pageInfo {
        endCursor
        hasNextPage
      }
    }
  }
}";
        assert_eq!(text, expected);
    }

    #[test]
    fn folders_query_expands_tasks_into_nested_connection() {
        let mut query = folders_query(["name", "tasks"]).expect("build");
        query.set_variable_value("projectName", "proj1").expect("set");

        let text = query.render().expect("render");
        let expected = "\
query FoldersQuery($projectName: String!) {
  project(name: $projectName) {
    folders(first: 300) {
      edges {
        node {
          tasks(first: 300) {
            edges {
              node {
                name
                taskType
              }
            }
            pageInfo {
              endCursor
              hasNextPage
            }
          }
          name
        }
        cursor
      }
      pageInfo {
        endCursor
        hasNextPage
      }
    }
  }
}";
        assert_eq!(text, expected);
    }

    #[test]
    fn versions_query_filters_render_only_when_set() {
        let mut query = versions_query(["version"]).expect("build");
        query.set_variable_value("projectName", "proj1").expect("set");
        query
            .set_variable_value("versions", vec![1_i64, 2])
            .expect("set");

        let text = query.render().expect("render");
        assert!(text.contains("versions(versions: $versions, first: 300) {"));
        assert!(!text.contains("heroOnly"));
    }

    #[test]
    fn project_query_expands_dotted_fields() {
        let mut query = project_query(["name", "data.group"]).expect("build");
        query.set_variable_value("projectName", "proj1").expect("set");

        let text = query.render().expect("render");
        let expected = "\
query ProjectQuery($projectName: String!) {
  project(name: $projectName) {
    name
    data {
      group
    }
  }
}";
        assert_eq!(text, expected);
    }
}
