/*!
# Marquee API documentation

This page describes the API endpoints available on Marquee. Every endpoint
accepts GET requests and takes parameters as query string values. Every
response body is JSON.

## Errors

Error responses have the body `{"error": "<message>"}`. Errors caused by an
upstream service also have a `details` key describing what the upstream said.

- 400 Bad Request - A parameter is missing or invalid. The message names it.
- 404 Not Found - Geocoding found no location for the address.
- 500 Internal Server Error - The upstream API key needed by the endpoint is
  not configured. This is checked before anything else.
- 502 Bad Gateway - The upstream could not be reached, timed out, answered with
  an error status, or sent a response that could not be read.

Upstream requests are never retried.

## Search

Endpoint: `/search`

Example: `/search?keyword=jazz&category=music&distance=10&lat=34.05&lon=-118.24`

### Query Parameters

- `keyword` - Required. Passed to the Discovery API as is, after trimming.
- `lat`, `lon` - Required. Degrees, within ±90 and ±180.
- `distance` - Search radius in miles. Defaults to 10. Must be positive.
- `category` - One of `music`, `sports`, `arts`, `theatre`, `film`, or
  `miscellaneous`, in any case. Anything else, including `default`, searches
  every category.

### Response

`{"events": [...]}`, soonest first. Each event has the string keys `id`,
`event`, `date`, `venue`, `genre`, and `icon`. Values the upstream doesn't have
are empty strings. `icon` is the event image closest to 200 pixels wide.

## Event

Endpoint: `/event?id=<event id>`

`{"event": {...}}` with the keys `id`, `name`, `date`, `time`, `status`,
`genres` (distinct classification names), `artists` (a list of `{name, url}`),
`venueName`, `buyUrl`, `seatmap`, and `priceRange` (such as `"25 - 75.5 USD"`,
or empty).

An event id the Discovery API doesn't know is a 502.

## Venue

Endpoint: `/venue?keyword=<venue name>`

`{"venue": {...}}` with the keys `name`, `address`, `city`, `state`,
`postalCode`, `url`, and `image`. The first five are `"N/A"` when unknown, the
last two are empty. When no venue matches, the response is `{"venue": null}`.

## Suggest

Endpoint: `/suggest?keyword=<partial keyword>`

`{"suggestions": [...]}`, up to ten attraction names. A blank keyword returns
an empty list.

## Geocode

Endpoint: `/api/geocode?address=<address>`

`{"lat": <number>, "lng": <number>}` for the first match of the address.

## Reverse geocoding

Endpoint: `/api/reverse-geocode?lat=<latitude>&lng=<longitude>`

`{"city": <string>, "fullAddress": <string>}` for the best match at the
position. The city is the first of the locality, the
`administrative_area_level_3`, and the `administrative_area_level_2` address
components, falling back to the full address. Positions are validated like
search positions (400), and a position with no match is 404.

## Health

Endpoint: `/health`

Always `{"ok": true}`. No upstream is contacted.
*/
