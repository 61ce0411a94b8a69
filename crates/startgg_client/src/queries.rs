//! GraphQL documents sent to start.gg. Paginated queries take `$page` and `$perPage`.

#[derive(Debug, Clone, Copy)]
pub struct Query {
    pub name: &'static str,
    pub text: &'static str,
}

pub const ENTRANTS_PER_PAGE: u32 = 100;
pub const STANDINGS_PER_PAGE: u32 = 100;
pub const SETS_PER_PAGE: u32 = 50;

pub const EVENT_INFO: Query = Query {
    name: "getEventId",
    text: r#"
query getEventId($slug: String) {
  event(slug: $slug) {
    id
    name
  }
}"#,
};

pub const EVENT_STATUS: Query = Query {
    name: "getEventStatus",
    text: r#"
query getEventStatus($eventId: ID!) {
  event(id: $eventId) {
    id
    name
    state
    numEntrants
    standings(query: {perPage: 8, page: 1}) {
      nodes {
        placement
        entrant { id name }
      }
    }
    phaseGroups {
      id
      displayIdentifier
      state
      rounds { id number bestOf }
    }
  }
}"#,
};

pub const ENTRANTS: Query = Query {
    name: "getEntrants",
    text: r#"
query getEntrants($eventId: ID!, $page: Int!, $perPage: Int!) {
  event(id: $eventId) {
    entrants(query: {page: $page, perPage: $perPage}) {
      pageInfo { totalPages }
      nodes { id name participants { gamerTag } }
    }
  }
}"#,
};

pub const STANDINGS: Query = Query {
    name: "getStandings",
    text: r#"
query getStandings($eventId: ID!, $page: Int!, $perPage: Int!) {
  event(id: $eventId) {
    standings(query: {perPage: $perPage, page: $page}) {
      pageInfo { totalPages }
      nodes {
        placement
        entrant { id name participants { gamerTag } }
        stats { phaseGroupId finalPlacement dq }
      }
    }
  }
}"#,
};

pub const ENTRANT_SETS: Query = Query {
    name: "getEntrantSets",
    text: r#"
query getEntrantSets($entrantId: ID!, $page: Int!, $perPage: Int!) {
  entrant(id: $entrantId) {
    sets(page: $page, perPage: $perPage, filters: { hideByes: true }) {
      pageInfo { totalPages }
      nodes {
        id
        round
        fullRoundText
        state
        winnerId
        slots { entrant { id name standing { placement } } }
        phaseGroup { phase { name } }
      }
    }
  }
}"#,
};

pub const EVENT_SETS: Query = Query {
    name: "getEventSets",
    text: r#"
query getEventSets($eventId: ID!, $entrantId: ID!, $page: Int!, $perPage: Int!) {
  event(id: $eventId) {
    sets(page: $page, perPage: $perPage, filters: { entrantIds: [$entrantId] }) {
      pageInfo { totalPages }
      nodes {
        id
        round
        fullRoundText
        state
        winnerId
        slots { entrant { id name standing { placement } } }
        phaseGroup { phase { name } }
      }
    }
  }
}"#,
};
